//! VCF header block handling
//!
//! A VCF data file starts with `##` meta lines and ends its header with the
//! `#CHROM` column line. When the first line carries the VCF file format
//! marker, the whole block is passed through as the header.

use crate::core::terminator::LineTerminator;
use memchr::memmem;
use std::io::{self, BufRead};

/// Marker identifying a multi-line VCF header
pub const VCF_MARKER: &[u8] = b"##fileformat=VCF";

/// Prefix of the line closing the VCF header
pub const VCF_COLUMN_HEADER: &[u8] = b"#CHROM";

/// Whether the first line of a data file opens a VCF header block
pub fn is_vcf_header(first_line: &[u8]) -> bool {
    memmem::find(first_line, VCF_MARKER).is_some()
}

/// Read the rest of a VCF header block into `header`.
///
/// Whole lines, terminators included, are appended verbatim until a line
/// starting with `#CHROM` (inclusive) or end of stream. Returns the number
/// of lines appended.
pub fn read_header_block<R: BufRead + ?Sized>(
    reader: &mut R,
    terminator: LineTerminator,
    header: &mut Vec<u8>,
) -> io::Result<usize> {
    let delimiter = terminator.delimiter();
    let mut lines = 0;

    loop {
        let start = header.len();
        if reader.read_until(delimiter, header)? == 0 {
            break;
        }
        lines += 1;
        if header[start..].starts_with(VCF_COLUMN_HEADER) {
            break;
        }
    }
    Ok(lines)
}
