//! Tab-separated record decoding
//!
//! Shared by the coordinate loader and the pipeline workers so both sides
//! extract and normalize chromosome names the same way.

use crate::core::error::{RecordError, RecordResult};
use memchr::memchr;

/// UCSC chromosome prefix
pub const CHR_PREFIX: &[u8] = b"chr";

/// Zero-based column indices of the chromosome and position fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub chrom_idx: usize,
    pub pos_idx: usize,
}

impl FieldLayout {
    /// Layout of data file lines (VCF-like: CHROM, POS, ...)
    pub const DATA: FieldLayout = FieldLayout {
        chrom_idx: 0,
        pos_idx: 1,
    };

    pub fn new(chrom_idx: usize, pos_idx: usize) -> Self {
        Self { chrom_idx, pos_idx }
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        FieldLayout::DATA
    }
}

/// Zero-copy view of one line
///
/// Only the chromosome and position are decoded; the rest of the line is
/// kept as-is so it can be forwarded unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Original line bytes, terminator excluded
    pub line: &'a [u8],
    /// Chromosome name as written in the line
    pub chrom: &'a [u8],
    /// Position
    pub pos: u64,
}

impl<'a> Record<'a> {
    /// Decode the chromosome and position columns of `line`
    pub fn parse(line: &'a [u8], layout: FieldLayout) -> RecordResult<Self> {
        let chrom = field(line, layout.chrom_idx)?;
        let pos = parse_position(field(line, layout.pos_idx)?)?;
        Ok(Self { line, chrom, pos })
    }
}

/// Return the `index`-th tab-separated field of `line`
pub fn field(line: &[u8], index: usize) -> RecordResult<&[u8]> {
    let mut rest = line;
    let mut current = 0;

    loop {
        let end = memchr(b'\t', rest);
        if current == index {
            return Ok(&rest[..end.unwrap_or(rest.len())]);
        }
        match end {
            Some(tab) => {
                rest = &rest[tab + 1..];
                current += 1;
            }
            None => {
                return Err(RecordError::MissingField {
                    column: index,
                    found: current + 1,
                })
            }
        }
    }
}

/// Parse a position column as a non-negative integer
pub fn parse_position(bytes: &[u8]) -> RecordResult<u64> {
    let text = std::str::from_utf8(bytes).map_err(|_| RecordError::InvalidUtf8)?;
    text.parse().map_err(|_| RecordError::InvalidPosition {
        value: text.to_string(),
    })
}

/// Apply UCSC-style normalization to a chromosome name.
///
/// Prefixes `chr` unless the name already starts with it (literal,
/// case-sensitive). The prefixed form is built in `buf`, which callers
/// reuse across lines.
///
/// # Examples
/// ```
/// use fast_posfilter::core::normalize_chrom;
///
/// let mut buf = Vec::new();
/// assert_eq!(normalize_chrom(b"1", &mut buf), b"chr1");
/// assert_eq!(normalize_chrom(b"chr1", &mut buf), b"chr1");
/// ```
pub fn normalize_chrom<'a>(chrom: &'a [u8], buf: &'a mut Vec<u8>) -> &'a [u8] {
    if chrom.starts_with(CHR_PREFIX) {
        return chrom;
    }
    buf.clear();
    buf.extend_from_slice(CHR_PREFIX);
    buf.extend_from_slice(chrom);
    buf
}

/// Chromosome key used for storage and lookup under the given policy
#[inline]
pub fn chrom_key<'a>(chrom: &'a [u8], normalize: bool, buf: &'a mut Vec<u8>) -> &'a [u8] {
    if normalize {
        normalize_chrom(chrom, buf)
    } else {
        chrom
    }
}
