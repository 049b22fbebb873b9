//! FastPosFilter CLI entry point
//!
//! Filters a VCF/SNP file (or stdin) down to the positions listed in a
//! BED-like coordinate file.

use anyhow::Context;
use clap::Parser;
use fast_posfilter::core::{
    open_data_input, open_output, CoordinateSet, FilterError, FilterPipeline, PipelineConfig,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS,
};
use fast_posfilter::formats::bed::{coordinate_layout, DEFAULT_CHROM_IDX};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fast-posfilter")]
#[command(about = "Keep the lines of a VCF/SNP file whose chromosome and position appear in a coordinate file")]
#[command(version)]
#[command(author = "FastPosFilter Contributors")]
struct Cli {
    /// Coordinate file (chromosome and position columns) to filter on
    #[arg(long = "bed-path", alias = "bedPath")]
    bed_path: Option<PathBuf>,

    /// Input file to filter (stdin if not specified)
    #[arg(long = "in-path", alias = "inPath")]
    in_path: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Normalize chromosomes to UCSC style (chrN) in both files
    #[arg(long = "ucsc-chr", alias = "ucscChr")]
    ucsc_chr: bool,

    /// Chromosome column index in the coordinate file
    #[arg(long = "chr-idx", alias = "chrIdx", default_value_t = DEFAULT_CHROM_IDX)]
    chr_idx: usize,

    /// Position column index in the coordinate file (default: 1, or 3 for .bim files)
    #[arg(long = "pos-idx", alias = "posIdx")]
    pos_idx: Option<usize>,

    /// Number of worker threads
    #[arg(short = 't', long, default_value_t = DEFAULT_WORKERS)]
    threads: usize,

    /// Capacity of the line queues between reader, workers and writer
    #[arg(long = "queue-capacity", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Write matches in input order even with several workers
    #[arg(long)]
    ordered: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let bed_path = cli
        .bed_path
        .ok_or_else(|| FilterError::Config("--bed-path is required".to_string()))?;

    let config = PipelineConfig {
        workers: cli.threads,
        queue_capacity: cli.queue_capacity,
        normalize_chrom: cli.ucsc_chr,
        preserve_order: cli.ordered,
    };
    config.validate()?;

    let layout = coordinate_layout(&bed_path, Some(cli.chr_idx), cli.pos_idx);
    log::info!("Loading coordinate file: {:?} ({:?})", bed_path, layout);
    let coords = CoordinateSet::from_path(&bed_path, layout, cli.ucsc_chr)
        .with_context(|| format!("Couldn't load coordinate file {:?}", bed_path))?;
    log::info!("Coordinate file loaded in {:.2}s", start.elapsed().as_secs_f64());

    let input = open_data_input(cli.in_path.as_deref())
        .with_context(|| format!("Couldn't open input {:?}", cli.in_path))?;
    let output = open_output(cli.output.as_deref())
        .with_context(|| format!("Couldn't open output {:?}", cli.output))?;

    let stats = FilterPipeline::new(&coords, config)
        .run(input, output)
        .context("Filtering failed")?;

    log::info!("=== Filter Statistics ===");
    log::info!("Header lines:    {}", stats.header_lines);
    log::info!("Total records:   {}", stats.records);
    log::info!("Matched:         {}", stats.matched);
    log::info!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
