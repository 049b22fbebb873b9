//! Error types for FastPosFilter
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for FastPosFilter operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed record in the coordinate or data file
    #[error("Invalid record at line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },

    /// A pipeline thread panicked
    #[error("Pipeline {0} thread panicked")]
    WorkerPanicked(&'static str),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// Attach a 1-based line number to a record error
    pub fn at_line(line: usize, source: RecordError) -> Self {
        FilterError::Record { line, source }
    }
}

/// Errors that can occur while decoding a single tab-separated line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Line has fewer columns than the requested index
    #[error("Missing column {column}: line has {found} field(s)")]
    MissingField { column: usize, found: usize },

    /// Position column is not a non-negative integer
    #[error("Couldn't convert position '{value}' to integer")]
    InvalidPosition { value: String },

    /// Position column is not valid UTF-8
    #[error("Invalid UTF-8 in position column")]
    InvalidUtf8,
}

/// Errors raised while detecting the line terminator of a stream
#[derive(Debug, Error)]
pub enum DetectError {
    /// Stream ended before any terminator was seen
    #[error("End of stream before a line terminator ({} byte(s) consumed)", .consumed.len())]
    UnexpectedEof { consumed: Vec<u8> },

    /// I/O error while reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for FastPosFilter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Result type alias for record decoding
pub type RecordResult<T> = std::result::Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_display() {
        let err = FilterError::at_line(
            3,
            RecordError::InvalidPosition {
                value: "NOTANUMBER".to_string(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("NOTANUMBER"));
    }

    #[test]
    fn test_detect_error_display() {
        let err = DetectError::UnexpectedEof {
            consumed: b"abc".to_vec(),
        };
        assert!(err.to_string().contains("3 byte(s)"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FilterError = io.into();
        assert!(matches!(err, FilterError::Io(_)));
    }
}
