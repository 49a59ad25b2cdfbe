//! Core record types for Eclipse schedule extraction.
//!
//! This crate defines the data produced when COMPDAT/COMPDATL well-connection
//! sections are pulled out of an Eclipse `.inc` schedule:
//!
//! - [`Keyword`]: the tracked section headers (`DATES`, `COMPDAT`,
//!   `COMPDATL`).
//! - [`Value`]: a positional field, numeric or a literal token such as
//!   `DEFAULT` or `OPEN`.
//! - [`Connection`]: one decoded well-connection line.
//! - [`Record`]: a connection tagged with its effective date, or a date-only
//!   row.
//! - [`ResultTable`]: the append-only output table with the fixed
//!   [`COLUMN_NAMES`] schema.
//!
//! Validation ([`validate_table`]) checks row invariants such as the Local
//! grid name being present only for COMPDATL rows and dates never moving
//! backwards.
//!
//! # Example
//!
//! ```
//! use eclipse_schedule_core::*;
//!
//! let values: Vec<Value> = "W1 10 10 1 3 OPEN DEFAULT 1 2 1 DEFAULT DEFAULT DEFAULT 1.0"
//!     .split_whitespace()
//!     .map(Value::parse)
//!     .collect();
//! let connection = Connection::from_positional(
//!     Keyword::Compdat,
//!     None,
//!     values.try_into().expect("14 fields"),
//! );
//!
//! let mut table = ResultTable::new();
//! table.push(Record::new(Some("01 JUN 2018".into()), connection));
//! assert_eq!(table.rows()[0].cells()[3], Some(Value::Number(10.0)));
//! assert!(validate_table(&table).is_empty());
//! ```

mod table;
mod types;
mod validate;

pub use table::ResultTable;
pub use types::*;
pub use validate::{ValidationError, parse_schedule_date, validate_record, validate_table};
