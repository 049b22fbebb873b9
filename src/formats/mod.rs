//! File format adapters
//!
//! Format-specific rules for the coordinate file (BED-like, PLINK `.bim`)
//! and the data file header (VCF).

pub mod bed;
pub mod vcf;

pub use bed::{coordinate_layout, is_bim};
pub use vcf::{is_vcf_header, read_header_block, VCF_COLUMN_HEADER, VCF_MARKER};
