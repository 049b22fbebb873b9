//! Line terminator detection
//!
//! The terminator of a data stream is not known in advance. The first line
//! is scanned until `\n`, `\r\n` or a bare `\r` is found; every later read
//! of the same stream uses that terminator.

use crate::core::error::DetectError;
use memchr::memchr2;
use std::io::{self, BufRead};

/// Line terminator of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    /// Unix style `\n`
    #[default]
    Lf,
    /// Windows style `\r\n`
    CrLf,
    /// Classic Mac style bare `\r`
    Cr,
}

impl LineTerminator {
    /// Byte handed to `read_until` when reading the rest of the stream
    #[inline]
    pub fn delimiter(self) -> u8 {
        match self {
            LineTerminator::Lf | LineTerminator::CrLf => b'\n',
            LineTerminator::Cr => b'\r',
        }
    }

    /// Encoded width in bytes
    #[inline]
    pub fn width(self) -> usize {
        self.as_bytes().len()
    }

    /// Full byte sequence
    #[inline]
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineTerminator::Lf => b"\n",
            LineTerminator::CrLf => b"\r\n",
            LineTerminator::Cr => b"\r",
        }
    }

    /// Strip one trailing terminator from `line`, if present
    ///
    /// The last line of a stream may have no terminator at all.
    #[inline]
    pub fn strip(self, line: &mut Vec<u8>) {
        if line.ends_with(self.as_bytes()) {
            line.truncate(line.len() - self.width());
        }
    }
}

/// Outcome of a successful detection pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detected {
    /// Terminator governing the whole stream
    pub terminator: LineTerminator,
    /// Content of the first line, terminator excluded
    pub consumed: Vec<u8>,
}

/// Consume the first line of `reader` and report its terminator.
///
/// Bytes before the terminator are returned in [`Detected::consumed`]. A
/// `\r` is disambiguated by peeking at the next byte without consuming it.
/// If the stream ends before any terminator, the partial line comes back in
/// [`DetectError::UnexpectedEof`].
pub fn detect_terminator<R: BufRead + ?Sized>(reader: &mut R) -> Result<Detected, DetectError> {
    let mut consumed = Vec::new();

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if buf.is_empty() {
            return Err(DetectError::UnexpectedEof { consumed });
        }

        match memchr2(b'\r', b'\n', buf) {
            Some(i) => {
                let found = buf[i];
                consumed.extend_from_slice(&buf[..i]);
                reader.consume(i + 1);

                if found == b'\n' {
                    return Ok(Detected {
                        terminator: LineTerminator::Lf,
                        consumed,
                    });
                }

                let terminator = if peek_byte(reader)? == Some(b'\n') {
                    reader.consume(1);
                    LineTerminator::CrLf
                } else {
                    LineTerminator::Cr
                };
                return Ok(Detected {
                    terminator,
                    consumed,
                });
            }
            None => {
                let len = buf.len();
                consumed.extend_from_slice(buf);
                reader.consume(len);
            }
        }
    }
}

fn peek_byte<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
