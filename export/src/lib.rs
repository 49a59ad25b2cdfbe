//! Export of extracted schedule tables.
//!
//! Writes a [`ResultTable`] as delimited text ([`write_csv`], [`save_csv`])
//! or as a JSON array of row objects ([`write_json`]). Null cells render as
//! empty CSV fields and JSON `null`; integral numbers keep one decimal place.
//!
//! # Example
//!
//! ```
//! use eclipse_schedule_core::{Record, ResultTable};
//! use eclipse_schedule_export::{CsvOptions, to_csv_string};
//!
//! let mut table = ResultTable::new();
//! table.push(Record::date_only(Some("01 JUN 2018".into())));
//!
//! let csv = to_csv_string(&table, &CsvOptions::default()).unwrap();
//! assert!(csv.starts_with("Date,Well name,Local grid name,I,J"));
//! assert!(csv.ends_with("01 JUN 2018,,,,,,,,,,,,,,,\n"));
//! ```
//!
//! [`ResultTable`]: eclipse_schedule_core::ResultTable

mod error;
mod json;
mod writer;

pub use error::{ExportError, Result};
pub use json::{to_json_string, write_json};
pub use writer::{CsvOptions, cell_text, save_csv, to_csv_string, write_csv};
