//! Parser run configuration.
//!
//! Defines the YAML-serializable settings that control how a schedule file is
//! read and how irregular content is treated. Every field has a default, so a
//! partial document (or an empty one) is valid.
//!
//! # Example YAML
//!
//! ```yaml
//! encoding: utf-8
//! chunk_size: 65536
//! on_malformed: skip
//! emit_empty_dates: true
//! require_terminator: false
//! ```

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// What to do with a record line whose token count does not fit the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Log a warning, keep it in diagnostics and continue (the default).
    #[default]
    Skip,
    /// Fail the whole run.
    Abort,
}

/// Settings for one parsing run.
///
/// # Examples
///
/// ```
/// use eclipse_schedule_parser::{MalformedPolicy, ParserConfig};
///
/// let config: ParserConfig = serde_yaml::from_str("on_malformed: abort").unwrap();
/// assert_eq!(config.on_malformed, MalformedPolicy::Abort);
/// assert_eq!(config.encoding, "utf-8");
/// assert!(config.emit_empty_dates);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// WHATWG label of the source encoding.
    pub encoding: String,
    /// Fragment size in bytes; `None` reads the whole file as one fragment.
    pub chunk_size: Option<usize>,
    /// Policy for record lines with the wrong number of fields.
    pub on_malformed: MalformedPolicy,
    /// Emit a null-filled row for dates that have no connection records.
    pub emit_empty_dates: bool,
    /// Treat a missing `END` marker as an error instead of a warning.
    pub require_terminator: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
            chunk_size: None,
            on_malformed: MalformedPolicy::Skip,
            emit_empty_dates: true,
            require_terminator: false,
        }
    }
}

impl ParserConfig {
    /// Resolves [`encoding`](Self::encoding) to an `encoding_rs` encoding.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEncoding`](ParseError::UnknownEncoding) for labels
    /// outside the WHATWG encoding standard.
    pub fn source_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| ParseError::UnknownEncoding(self.encoding.clone()))
    }
}
