//! Core filtering functionality
//!
//! This module contains the line terminator detector, the record codec,
//! the coordinate set and the concurrent filter pipeline.

pub mod coords;
mod error;
pub mod io;
pub mod pipeline;
pub mod record;
pub mod terminator;

pub use coords::CoordinateSet;
pub use error::{DetectError, FilterError, RecordError, RecordResult, Result};
pub use io::{
    detect_compression, open_data_input, open_input, open_output, ByteLineIterator,
    CompressionFormat, InputStream, OutputStream, DEFAULT_BUFFER_SIZE,
};
pub use pipeline::{
    FilterPipeline, FilterStats, PipelineConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS,
};
pub use record::{chrom_key, normalize_chrom, FieldLayout, Record};
pub use terminator::{detect_terminator, Detected, LineTerminator};
