//! Error types for table export.

use thiserror::Error;

/// Errors that can occur while writing a result table.
#[derive(Debug, Error)]
pub enum ExportError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization failure.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Encoding label not known to the WHATWG encoding standard.
    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    /// Delimiter is not a single ASCII character.
    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),

    /// The table holds characters the target encoding cannot represent.
    #[error("table contains characters not representable in {encoding}")]
    Unencodable { encoding: &'static str },
}

/// Convenience alias for results with [`ExportError`].
pub type Result<T> = std::result::Result<T, ExportError>;
