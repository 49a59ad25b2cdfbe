//! Error types for schedule parsing.
//!
//! Input-contract violations are grouped under [`InvalidInput`] so callers can
//! tell them apart from failures that happen while reading or decoding.

use std::path::PathBuf;

use eclipse_schedule_core::Keyword;
use thiserror::Error;

/// The input file does not satisfy the `.inc` contract. Raised before any
/// byte of the file is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// Path does not exist or is not a regular file.
    #[error("'{}' is not a file", .0.display())]
    NotAFile(PathBuf),

    /// File extension is not `.inc`.
    #[error("incorrect file type '{extension}' for '{}'; expected .inc", .path.display())]
    UnsupportedExtension { path: PathBuf, extension: String },

    /// File has zero bytes.
    #[error("'{}' is empty", .0.display())]
    EmptyFile(PathBuf),
}

/// A record line whose token count does not match the column schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {keyword} record '{line}': expected {expected} fields, found {found}")]
pub struct MalformedRecord {
    pub keyword: Keyword,
    pub line: String,
    pub expected: usize,
    pub found: usize,
}

/// Errors that can occur during a parsing run.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input file contract violation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Encoding label not known to the WHATWG encoding standard.
    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    /// Record line rejected under the abort policy.
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecord),

    /// Input ended without an `END` marker while the terminator is required.
    #[error("schedule has no END marker; {lines} trailing line(s) were not flushed")]
    Unterminated { lines: usize },
}

impl ParseError {
    /// Returns `true` for input-contract violations.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ParseError::InvalidInput(_))
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
