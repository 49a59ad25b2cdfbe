//! JSON export: one object per row, keyed by column name.

use std::io::Write;

use eclipse_schedule_core::{COLUMN_NAMES, Record, ResultTable, Value};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::Result;

/// Serializes a row as a map in [`COLUMN_NAMES`] order. Null cells become
/// JSON `null`; numbers stay numbers.
struct RowObject<'a>(&'a Record);

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let cells = self.0.cells();
        let mut map = serializer.serialize_map(Some(COLUMN_NAMES.len()))?;
        for (name, cell) in COLUMN_NAMES.iter().zip(&cells) {
            match cell {
                None => map.serialize_entry(name, &None::<f64>)?,
                Some(Value::Number(number)) if !number.is_finite() => {
                    map.serialize_entry(name, &None::<f64>)?
                }
                Some(value) => map.serialize_entry(name, value)?,
            }
        }
        map.end()
    }
}

struct TableRows<'a>(&'a ResultTable);

impl Serialize for TableRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for row in self.0 {
            seq.serialize_element(&RowObject(row))?;
        }
        seq.end()
    }
}

/// Writes the table as a JSON array of row objects and flushes `writer`.
pub fn write_json<W: Write>(table: &ResultTable, mut writer: W, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &TableRows(table))?;
    } else {
        serde_json::to_writer(&mut writer, &TableRows(table))?;
    }
    writer.flush()?;
    Ok(())
}

/// Renders the table as a JSON array of row objects.
///
/// # Examples
///
/// ```
/// use eclipse_schedule_core::{Record, ResultTable};
/// use eclipse_schedule_export::to_json_string;
///
/// let mut table = ResultTable::new();
/// table.push(Record::date_only(Some("01 JUN 2018".into())));
///
/// let json = to_json_string(&table, false).unwrap();
/// assert!(json.starts_with(r#"[{"Date":"01 JUN 2018","Well name":null"#));
/// ```
pub fn to_json_string(table: &ResultTable, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(&TableRows(table))?
    } else {
        serde_json::to_string(&TableRows(table))?
    };
    Ok(json)
}
