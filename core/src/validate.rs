//! Result table validation.
//!
//! Checks structural invariants of decoded rows: the Local grid name column
//! is populated exactly for COMPDATL connections, every connection names a
//! well, and dates are readable Eclipse calendar dates that never move
//! backwards.
//!
//! # Examples
//!
//! ```
//! use eclipse_schedule_core::*;
//!
//! let mut table = ResultTable::new();
//! table.push(Record::date_only(Some("01 JUN 2018".into())));
//! table.push(Record::date_only(Some("01 JLY 2018".into())));
//! assert!(validate_table(&table).is_empty());
//!
//! table.push(Record::date_only(Some("sometime".into())));
//! assert!(!validate_table(&table).is_empty());
//! ```

use chrono::NaiveDate;
use thiserror::Error;

use crate::{Keyword, Record, ResultTable, Value};

/// Row-level validation errors. Each variant carries the zero-based row index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Local grid name is set on a COMPDAT row or missing on a COMPDATL row.
    #[error("row {row}: local grid name does not match {keyword} source")]
    LocalGridMismatch { row: usize, keyword: Keyword },
    /// Well name column is empty.
    #[error("row {row}: empty well name")]
    EmptyWellName { row: usize },
    /// Date is not of the form `DD MON YYYY`.
    #[error("row {row}: unreadable date '{date}'")]
    UnreadableDate { row: usize, date: String },
    /// Date precedes a date seen on an earlier row.
    #[error("row {row}: date '{date}' precedes earlier date '{previous}'")]
    DateOutOfOrder {
        row: usize,
        date: String,
        previous: String,
    },
}

/// Parses an Eclipse `DATES` entry such as `01 JUN 2018`.
///
/// Month names are three-letter abbreviations in any case; `JLY` is accepted
/// for July.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use eclipse_schedule_core::parse_schedule_date;
///
/// assert_eq!(parse_schedule_date("01 JLY 2018"), NaiveDate::from_ymd_opt(2018, 7, 1));
/// assert_eq!(parse_schedule_date("31 FEB 2018"), None);
/// ```
pub fn parse_schedule_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month = month_number(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_uppercase().as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" | "JLY" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}

/// Validates every row of a table, returning all errors found.
pub fn validate_table(table: &ResultTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut latest: Option<(NaiveDate, &str)> = None;

    for (row, record) in table.iter().enumerate() {
        errors.extend(validate_record(row, record));

        let Some(date) = record.date.as_deref() else {
            continue;
        };
        let Some(parsed) = parse_schedule_date(date) else {
            errors.push(ValidationError::UnreadableDate {
                row,
                date: date.to_string(),
            });
            continue;
        };
        match latest {
            Some((previous, previous_text)) if parsed < previous => {
                errors.push(ValidationError::DateOutOfOrder {
                    row,
                    date: date.to_string(),
                    previous: previous_text.to_string(),
                });
            }
            _ => latest = Some((parsed, date)),
        }
    }

    errors
}

/// Validates the connection part of a single row.
pub fn validate_record(row: usize, record: &Record) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let Some(connection) = &record.connection else {
        return errors;
    };

    let expects_grid = connection.source == Keyword::Compdatl;
    if connection.local_grid.is_some() != expects_grid {
        errors.push(ValidationError::LocalGridMismatch {
            row,
            keyword: connection.source,
        });
    }

    if matches!(&connection.well, Value::Text(name) if name.trim().is_empty()) {
        errors.push(ValidationError::EmptyWellName { row });
    }

    errors
}
