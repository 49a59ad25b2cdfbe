//! Delimited-text export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{Terminator, WriterBuilder};
use eclipse_schedule_core::{COLUMN_NAMES, ResultTable, Value};
use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ExportError, Result};

/// Options for CSV output. Every field has a default, so these can be
/// embedded in a larger YAML document and left partially specified.
///
/// # Examples
///
/// ```
/// use eclipse_schedule_export::CsvOptions;
///
/// let options = CsvOptions::default();
/// assert_eq!(options.delimiter, ',');
/// assert_eq!(options.encoding, "utf-8");
/// assert!(options.write_header);
/// assert!(!options.write_index);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: char,
    /// WHATWG label of the output encoding.
    pub encoding: String,
    pub write_header: bool,
    /// Prepend a zero-based row index column with an empty header.
    pub write_index: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            encoding: "utf-8".to_string(),
            write_header: true,
            write_index: false,
        }
    }
}

impl CsvOptions {
    /// Resolves [`encoding`](Self::encoding) to an `encoding_rs` encoding.
    pub fn output_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| ExportError::UnknownEncoding(self.encoding.clone()))
    }

    fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(ExportError::InvalidDelimiter(self.delimiter))
    }
}

/// Text of one cell: empty for nulls, otherwise the value's display form.
pub fn cell_text(cell: Option<&Value>) -> String {
    cell.map(Value::to_string).unwrap_or_default()
}

/// Writes the table as delimited text.
///
/// Rows keep table order and columns follow [`COLUMN_NAMES`]. Output is
/// produced in UTF-8 and transcoded when another encoding is requested.
///
/// # Errors
///
/// Returns [`Unencodable`](ExportError::Unencodable) when a cell cannot be
/// represented in the target encoding, besides the usual I/O and option
/// errors.
pub fn write_csv<W: Write>(table: &ResultTable, mut writer: W, options: &CsvOptions) -> Result<()> {
    let encoding = options.output_encoding()?;
    let delimiter = options.delimiter_byte()?;

    let mut csv = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(Vec::new());

    if options.write_header {
        let mut header: Vec<&str> = Vec::with_capacity(COLUMN_NAMES.len() + 1);
        if options.write_index {
            header.push("");
        }
        header.extend(COLUMN_NAMES);
        csv.write_record(&header)?;
    }

    for (index, row) in table.iter().enumerate() {
        let mut fields = Vec::with_capacity(COLUMN_NAMES.len() + 1);
        if options.write_index {
            fields.push(index.to_string());
        }
        fields.extend(row.cells().iter().map(|cell| cell_text(cell.as_ref())));
        csv.write_record(&fields)?;
    }

    let bytes = csv.into_inner().map_err(|err| err.into_error())?;
    if encoding == UTF_8 {
        writer.write_all(&bytes)?;
    } else {
        let text = String::from_utf8_lossy(&bytes);
        let (encoded, _, had_errors) = encoding.encode(&text);
        if had_errors {
            return Err(ExportError::Unencodable {
                encoding: encoding.name(),
            });
        }
        writer.write_all(&encoded)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the table to `path`, creating or truncating the file.
pub fn save_csv(table: &ResultTable, path: impl AsRef<Path>, options: &CsvOptions) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(table, BufWriter::new(file), options)?;
    info!(path = %path.display(), rows = table.len(), encoding = %options.encoding, "Saved CSV");
    Ok(())
}

/// Renders the table as a CSV string (UTF-8 only).
pub fn to_csv_string(table: &ResultTable, options: &CsvOptions) -> Result<String> {
    let options = CsvOptions {
        encoding: UTF_8.name().to_string(),
        ..options.clone()
    };
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer, &options)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eclipse_schedule_core::{Connection, Keyword, Record};

    fn connection(keyword: Keyword, local_grid: Option<&str>, line: &str) -> Connection {
        let values: Vec<Value> = line.split(' ').map(Value::parse).collect();
        Connection::from_positional(
            keyword,
            local_grid.map(String::from),
            values.try_into().unwrap(),
        )
    }

    fn sample_table() -> ResultTable {
        let mut table = ResultTable::new();
        table.push(Record::new(
            None,
            connection(
                Keyword::Compdat,
                None,
                "W1 10 10 1 3 OPEN DEFAULT 1 2 1 DEFAULT DEFAULT DEFAULT 1.0",
            ),
        ));
        table.push(Record::date_only(Some("01 JUN 2018".into())));
        table.push(Record::new(
            Some("01 SEP 2018".into()),
            connection(
                Keyword::Compdatl,
                Some("LGR1"),
                "W3 10 10 2 2 OPEN DEFAULT 1 2 1 DEFAULT DEFAULT DEFAULT 1.0918",
            ),
        ));
        table
    }

    #[test]
    fn test_default_csv_layout() {
        let csv = to_csv_string(&sample_table(), &CsvOptions::default()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], COLUMN_NAMES.join(","));
        assert_eq!(
            lines[1],
            ",W1,,10.0,10.0,1.0,3.0,OPEN,DEFAULT,1.0,2.0,1.0,DEFAULT,DEFAULT,DEFAULT,1.0"
        );
        assert_eq!(lines[2], format!("01 JUN 2018{}", ",".repeat(15)));
        assert_eq!(
            lines[3],
            "01 SEP 2018,W3,LGR1,10.0,10.0,2.0,2.0,OPEN,DEFAULT,1.0,2.0,1.0,DEFAULT,DEFAULT,DEFAULT,1.0918"
        );
    }

    #[test]
    fn test_index_and_header_options() {
        let options = CsvOptions {
            delimiter: ';',
            write_header: false,
            write_index: true,
            ..CsvOptions::default()
        };
        let csv = to_csv_string(&sample_table(), &options).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("0;;W1;;10.0"));
        assert!(lines[1].starts_with("1;01 JUN 2018;"));
        assert!(lines[2].starts_with("2;01 SEP 2018;W3;LGR1;"));
    }

    #[test]
    fn test_index_header_is_blank() {
        let options = CsvOptions {
            write_index: true,
            ..CsvOptions::default()
        };
        let csv = to_csv_string(&ResultTable::new(), &options).unwrap();
        assert_eq!(csv, format!(",{}\n", COLUMN_NAMES.join(",")));
    }

    #[test]
    fn test_legacy_encoding_output() {
        let mut table = ResultTable::new();
        table.push(Record::new(
            Some("01 JUN 2018".into()),
            connection(
                Keyword::Compdat,
                None,
                "Скв1 10 10 1 3 OPEN DEFAULT 1 2 1 DEFAULT DEFAULT DEFAULT 1.0",
            ),
        ));
        let options = CsvOptions {
            encoding: "windows-1251".to_string(),
            write_header: false,
            ..CsvOptions::default()
        };

        let mut bytes = Vec::new();
        write_csv(&table, &mut bytes, &options).unwrap();
        let (text, _, had_errors) = encoding_rs::WINDOWS_1251.decode(&bytes);
        assert!(!had_errors);
        assert!(text.starts_with("01 JUN 2018,Скв1,,10.0"));
        assert!(!bytes.starts_with("01 JUN 2018,Скв1".as_bytes()));
    }

    #[test]
    fn test_unencodable_cells_are_rejected() {
        let mut table = ResultTable::new();
        table.push(Record::date_only(Some("01 JUN 2018 ✓".into())));
        let options = CsvOptions {
            encoding: "windows-1251".to_string(),
            ..CsvOptions::default()
        };
        let err = write_csv(&table, Vec::new(), &options).unwrap_err();
        assert!(matches!(err, ExportError::Unencodable { encoding: "windows-1251" }));
    }

    #[test]
    fn test_invalid_options() {
        let table = sample_table();
        let options = CsvOptions {
            delimiter: '¦',
            ..CsvOptions::default()
        };
        assert!(matches!(
            write_csv(&table, Vec::new(), &options),
            Err(ExportError::InvalidDelimiter('¦'))
        ));

        let options = CsvOptions {
            encoding: "utf-9".to_string(),
            ..CsvOptions::default()
        };
        assert!(matches!(
            write_csv(&table, Vec::new(), &options),
            Err(ExportError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&Value::Number(3.0))), "3.0");
        assert_eq!(cell_text(Some(&Value::Number(1.0718))), "1.0718");
        assert_eq!(cell_text(Some(&Value::Text("OPEN".into()))), "OPEN");
    }
}
