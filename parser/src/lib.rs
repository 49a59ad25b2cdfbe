//! Eclipse schedule parsing.
//!
//! Extracts COMPDAT and COMPDATL well-connection records from an Eclipse
//! `.inc` schedule and tags each one with the DATES entry it falls under.
//! Everything else in the deck (comments, untracked keywords, blank lines) is
//! filtered out during normalization.
//!
//! # Main entry points
//!
//! - [`ScheduleParser`] checks a file against the input contract (existing,
//!   non-empty, `.inc`) and parses it fragment by fragment.
//! - [`SchedulePipeline`] parses text fed in arbitrary fragments.
//! - [`parse_schedule_text`] parses an in-memory schedule in one call.
//! - [`normalize_schedule_text`] exposes the normalized line stream.
//!
//! # Example
//!
//! ```
//! use eclipse_schedule_parser::{ParserConfig, parse_schedule_text};
//!
//! let schedule = "\
//! COMPDAT
//! 'W1' 10 10 1 3 OPEN 1* 1 2 1 3* 1.0 /
//! /
//! DATES
//! 01 JUN 2018 /
//! /
//! COMPDATL
//! 'W3' 'LGR1' 10 10 2 2 OPEN 1* 1 2 1 3* 1.0918 /
//! /
//! END
//! ";
//!
//! let outcome = parse_schedule_text(schedule, &ParserConfig::default()).unwrap();
//! let table = outcome.table;
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.rows()[0].date, None);
//! assert_eq!(table.rows()[1].date.as_deref(), Some("01 JUN 2018"));
//! assert_eq!(table.rows()[1].local_grid(), Some("LGR1"));
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod parser;
pub mod reader;

use std::path::Path;

pub use config::{MalformedPolicy, ParserConfig};
pub use error::{InvalidInput, MalformedRecord, ParseError, Result};
pub use input::{SCHEDULE_EXTENSION, ScheduleInput};
pub use parser::normalize::normalize_schedule_text;
pub use parser::{ParseDiagnostics, ParseOutcome, ScheduleParser, SchedulePipeline};

/// Parses an in-memory schedule as a single fragment.
///
/// # Errors
///
/// See [`SchedulePipeline::finish`].
pub fn parse_schedule_text(text: &str, config: &ParserConfig) -> Result<ParseOutcome> {
    let mut pipeline = SchedulePipeline::new(config);
    pipeline.feed(text)?;
    pipeline.finish()
}

/// Checks and parses a schedule file.
///
/// # Errors
///
/// Returns [`ParseError::InvalidInput`] before any content is read when the
/// path breaks the input contract, otherwise any error of
/// [`ScheduleParser::parse`].
pub fn parse_schedule_file(path: impl AsRef<Path>, config: ParserConfig) -> Result<ParseOutcome> {
    ScheduleParser::new(path, config)?.parse()
}
