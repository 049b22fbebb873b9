//! Coordinate file column layout
//!
//! Coordinate files are BED-like: tab separated with the chromosome and
//! position at configurable columns. PLINK `.bim` files keep the base-pair
//! position in column 3, so that becomes the default position column when
//! the caller did not pick one.

use crate::core::record::FieldLayout;
use std::path::Path;

/// Default chromosome column
pub const DEFAULT_CHROM_IDX: usize = 0;

/// Default position column
pub const DEFAULT_POS_IDX: usize = 1;

/// Position column of PLINK `.bim` files
pub const BIM_POS_IDX: usize = 3;

/// Extension that switches the default position column
pub const BIM_EXTENSION: &str = "bim";

/// Resolve the column layout of a coordinate file.
///
/// An explicit `pos_idx` always wins; otherwise `.bim` files use
/// column 3 and everything else column 1.
pub fn coordinate_layout(
    path: &Path,
    chrom_idx: Option<usize>,
    pos_idx: Option<usize>,
) -> FieldLayout {
    let pos_idx = pos_idx.unwrap_or_else(|| {
        if is_bim(path) {
            BIM_POS_IDX
        } else {
            DEFAULT_POS_IDX
        }
    });
    FieldLayout::new(chrom_idx.unwrap_or(DEFAULT_CHROM_IDX), pos_idx)
}

/// Whether `path` names a PLINK `.bim` file (case-sensitive suffix)
pub fn is_bim(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(BIM_EXTENSION)
}
