//! I/O helpers
//!
//! Opens coordinate and data inputs with transparent gzip/bzip2
//! decompression, and wraps stdin/stdout in large buffers.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Default buffer size for readers and writers (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Boxed input stream handed to the pipeline
pub type InputStream = Box<dyn BufRead + Send>;

/// Boxed output sink handed to the pipeline
pub type OutputStream = Box<dyn Write + Send>;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file extension, then magic bytes
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = read_prefix(&mut file, &mut magic)?;
    Ok(compression_from_magic(&magic[..bytes_read]))
}

fn compression_from_magic(magic: &[u8]) -> CompressionFormat {
    if magic.starts_with(&[0x1f, 0x8b]) {
        CompressionFormat::Gzip
    } else if magic.starts_with(b"BZh") {
        CompressionFormat::Bzip2
    } else {
        CompressionFormat::Plain
    }
}

fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Open a file for reading, decompressing gzip and bzip2 on the fly
pub fn open_input(path: &Path) -> io::Result<InputStream> {
    let format = detect_compression(path)?;
    let file = File::open(path)?;

    log::debug!("Opening {:?} ({:?})", path, format);
    Ok(match format {
        CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::MultiGzDecoder::new(file),
        )),
        CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        CompressionFormat::Plain => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    })
}

/// Buffered standard input
pub fn open_stdin() -> InputStream {
    Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, io::stdin()))
}

/// Open the data input: a file if given, stdin otherwise
pub fn open_data_input(path: Option<&Path>) -> io::Result<InputStream> {
    match path {
        Some(p) => open_input(p),
        None => Ok(open_stdin()),
    }
}

/// Open the output sink: a file if given, stdout otherwise
pub fn open_output(path: Option<&Path>) -> io::Result<OutputStream> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::with_capacity(
            DEFAULT_BUFFER_SIZE,
            File::create(p)?,
        )),
        None => Box::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, io::stdout())),
    })
}

/// Byte line iterator that reuses its buffer
///
/// Strips a trailing `\n` or `\r\n`.
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Read the next line as bytes
    /// Returns None at EOF, Some(Ok(&[u8])) on success, Some(Err) on error
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None, // EOF
            Ok(_) => {
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read_all(mut reader: InputStream) -> io::Result<String> {
        let mut out = String::new();
        reader.read_to_string(&mut out)?;
        Ok(out)
    }

    #[test]
    fn test_default_buffer_size() {
        assert_eq!(DEFAULT_BUFFER_SIZE, 128 * 1024);
    }

    #[test]
    fn test_compression_from_magic() {
        assert_eq!(compression_from_magic(&[0x1f, 0x8b, 0x08]), CompressionFormat::Gzip);
        assert_eq!(compression_from_magic(b"BZh"), CompressionFormat::Bzip2);
        assert_eq!(compression_from_magic(b"chr"), CompressionFormat::Plain);
        assert_eq!(compression_from_magic(b""), CompressionFormat::Plain);
    }

    #[test]
    fn test_open_plain() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"1\t100\n")?;
        temp.flush()?;

        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Plain);
        assert_eq!(read_all(open_input(temp.path())?)?, "1\t100\n");
        Ok(())
    }

    #[test]
    fn test_open_gzip_by_magic() -> io::Result<()> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"chr1\t100\nchr2\t200\n")?;
        let compressed = encoder.finish()?;

        let mut temp = NamedTempFile::new()?;
        temp.write_all(&compressed)?;
        temp.flush()?;

        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Gzip);
        assert_eq!(read_all(open_input(temp.path())?)?, "chr1\t100\nchr2\t200\n");
        Ok(())
    }

    #[test]
    fn test_open_missing_file() {
        assert!(open_input(Path::new("/nonexistent/input.vcf")).is_err());
    }

    #[test]
    fn test_byte_line_iterator() {
        let mut iter = ByteLineIterator::new(&b"line1\nline2\r\nline3"[..]);

        assert_eq!(iter.next_line().unwrap().unwrap(), b"line1");
        assert_eq!(iter.next_line().unwrap().unwrap(), b"line2");
        assert_eq!(iter.next_line().unwrap().unwrap(), b"line3");
        assert!(iter.next_line().is_none());
    }
}
