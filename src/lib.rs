//! FastPosFilter - concurrent position filter for genomic text files
//!
//! Keeps the lines of a VCF/SNP-style data file whose (chromosome,
//! position) pair appears in a BED-like coordinate file.
//!
//! # Features
//!
//! - LF, CRLF and bare CR terminators detected from the data itself
//! - Header and VCF header block passed through verbatim
//! - Producer / worker pool / consumer pipeline over bounded queues
//! - Optional `chr` prefix normalization of chromosome names
//! - Support for compressed inputs (gzip, bzip2)
//!
//! # Example
//!
//! ```
//! use fast_posfilter::{CoordinateSet, FieldLayout, FilterPipeline, PipelineConfig};
//!
//! let coords = CoordinateSet::from_reader(
//!     &b"1\t100\n"[..],
//!     FieldLayout::default(),
//!     false,
//! )?;
//!
//! let mut out = Vec::new();
//! let config = PipelineConfig::default().with_workers(1);
//! FilterPipeline::new(&coords, config).run(&b"#CHROM\tPOS\n1\t100\n2\t200\n"[..], &mut out)?;
//! assert_eq!(out, b"#CHROM\tPOS\n1\t100\n");
//! # Ok::<(), fast_posfilter::FilterError>(())
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::core::{
    detect_terminator, normalize_chrom, CoordinateSet, DetectError, FieldLayout, FilterError,
    FilterPipeline, FilterStats, LineTerminator, PipelineConfig, Record, RecordError, Result,
};
pub use formats::{bed, coordinate_layout, vcf};
