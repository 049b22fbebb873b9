//! Performance benchmarks for FastPosFilter
//!
//! Run with: cargo bench

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use fast_posfilter::core::{CoordinateSet, FieldLayout, FilterPipeline, PipelineConfig, Record};
use std::io::Cursor;

const RECORDS: u64 = 200_000;

/// Synthetic VCF body with one record per position on chr1..chr4
fn synthetic_vcf() -> Vec<u8> {
    let mut data = b"##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n".to_vec();
    for i in 0..RECORDS {
        let line = format!("chr{}\t{}\t.\tA\tG\t50\tPASS\tDP=30\n", i % 4 + 1, i);
        data.extend_from_slice(line.as_bytes());
    }
    data
}

/// Every tenth position
fn synthetic_coords() -> CoordinateSet {
    let mut bed = String::new();
    for i in (0..RECORDS).step_by(10) {
        bed.push_str(&format!("chr{}\t{}\n", i % 4 + 1, i));
    }
    CoordinateSet::from_reader(bed.as_bytes(), FieldLayout::default(), false).unwrap()
}

/// Benchmark coordinate set loading
fn bench_coordinate_loading(c: &mut Criterion) {
    let mut bed = String::new();
    for i in 0..100_000u64 {
        bed.push_str(&format!("{}\t{}\n", i % 22 + 1, i));
    }

    c.bench_function("coords_load_100k", |b| {
        b.iter(|| {
            let set = CoordinateSet::from_reader(
                black_box(bed.as_bytes()),
                FieldLayout::default(),
                true,
            )
            .unwrap();
            black_box(set)
        })
    });
}

/// Benchmark single record decoding
fn bench_record_parse(c: &mut Criterion) {
    let line = b"chr1\t123456\trs42\tA\tG\t50\tPASS\tDP=30;AF=0.5\tGT\t0/1";

    c.bench_function("record_parse", |b| {
        b.iter(|| black_box(Record::parse(black_box(line), FieldLayout::DATA).unwrap()))
    });
}

/// Benchmark the pipeline with different worker counts
fn bench_pipeline_workers(c: &mut Criterion) {
    let data = synthetic_vcf();
    let coords = synthetic_coords();

    let mut group = c.benchmark_group("pipeline_workers");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(10);

    for workers in [1usize, 2, 4, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            let config = PipelineConfig::default().with_workers(workers);
            b.iter_batched(
                || Cursor::new(data.clone()),
                |reader| {
                    let mut out = Vec::with_capacity(data.len() / 8);
                    let stats = FilterPipeline::new(&coords, config)
                        .run(black_box(reader), &mut out)
                        .unwrap();
                    black_box(stats)
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

/// Benchmark ordered output against completion-order output
fn bench_pipeline_ordered(c: &mut Criterion) {
    let data = synthetic_vcf();
    let coords = synthetic_coords();

    let mut group = c.benchmark_group("pipeline_ordering");
    group.sample_size(10);

    for ordered in [false, true] {
        group.bench_with_input(BenchmarkId::from_parameter(ordered), &ordered, |b, &ordered| {
            let config = PipelineConfig::default().with_preserve_order(ordered);
            b.iter_batched(
                || Cursor::new(data.clone()),
                |reader| {
                    let mut out = Vec::new();
                    FilterPipeline::new(&coords, config)
                        .run(black_box(reader), &mut out)
                        .unwrap()
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_coordinate_loading,
    bench_record_parse,
    bench_pipeline_workers,
    bench_pipeline_ordered,
);
criterion_main!(benches);
