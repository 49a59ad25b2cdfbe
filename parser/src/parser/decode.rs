//! Record decoding: keyword groups to table rows.

use eclipse_schedule_core::{
    COLUMN_NAMES, CONNECTION_FIELDS, Connection, DATE_COLUMN, Keyword, LOCAL_GRID_COLUMN, Record,
    ResultTable, Value,
};
use tracing::warn;

use super::classify::KeywordGroups;
use crate::config::{MalformedPolicy, ParserConfig};
use crate::error::MalformedRecord;

/// Decodes one normalized COMPDAT or COMPDATL line.
///
/// The line must carry exactly [`Keyword::token_count`] tokens. Tokens are
/// assigned by walking the column schema: the Date column never consumes a
/// token, the Local grid name column consumes one only for COMPDATL, every
/// other column consumes the next token.
///
/// # Errors
///
/// Returns [`MalformedRecord`] on a token count mismatch, or when `keyword`
/// does not produce connections.
pub fn decode_line(keyword: Keyword, line: &str) -> Result<Connection, MalformedRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let expected = keyword.token_count().unwrap_or(0);
    let malformed = || MalformedRecord {
        keyword,
        line: line.to_string(),
        expected,
        found: tokens.len(),
    };
    if expected == 0 || tokens.len() != expected {
        return Err(malformed());
    }

    let mut remaining = tokens.iter();
    let mut local_grid = None;
    let mut values = Vec::with_capacity(CONNECTION_FIELDS);
    for column in 0..COLUMN_NAMES.len() {
        match column {
            DATE_COLUMN => {}
            LOCAL_GRID_COLUMN => {
                if keyword == Keyword::Compdatl {
                    local_grid = remaining.next().map(|token| token.to_string());
                }
            }
            _ => values.extend(remaining.next().map(|token| Value::parse(token))),
        }
    }

    let values: [Value; CONNECTION_FIELDS] = values.try_into().map_err(|_| malformed())?;
    Ok(Connection::from_positional(keyword, local_grid, values))
}

/// Outcome of appending one block to the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppendSummary {
    /// Connection rows appended.
    pub records: usize,
    /// Whether a date-only row was appended.
    pub date_only: bool,
    /// Lines skipped under [`MalformedPolicy::Skip`].
    pub skipped: Vec<MalformedRecord>,
}

/// Turns classified blocks into [`ResultTable`] rows.
#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder {
    policy: MalformedPolicy,
    emit_empty_dates: bool,
}

impl RecordDecoder {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            policy: config.on_malformed,
            emit_empty_dates: config.emit_empty_dates,
        }
    }

    /// Appends the rows of one block: COMPDAT connections first, then
    /// COMPDATL, all tagged with the block's effective date. A dated block
    /// that decodes no connection yields a single date-only row when enabled.
    ///
    /// Rows are only appended once the whole block decoded, so an abort
    /// leaves the table as it was before this block.
    pub fn append(
        &self,
        groups: KeywordGroups,
        table: &mut ResultTable,
    ) -> Result<AppendSummary, MalformedRecord> {
        let date = groups.effective_date().map(str::to_string);
        let mut rows = Vec::with_capacity(groups.connection_lines().max(1));
        let mut summary = AppendSummary::default();

        for keyword in [Keyword::Compdat, Keyword::Compdatl] {
            for line in groups.group(keyword) {
                match decode_line(keyword, line) {
                    Ok(connection) => rows.push(Record::new(date.clone(), connection)),
                    Err(err) if self.policy == MalformedPolicy::Abort => return Err(err),
                    Err(err) => {
                        warn!(
                            keyword = %err.keyword,
                            expected = err.expected,
                            found = err.found,
                            line = %err.line,
                            "Skipping malformed record"
                        );
                        summary.skipped.push(err);
                    }
                }
            }
        }
        summary.records = rows.len();

        if self.emit_empty_dates && date.is_some() && rows.is_empty() {
            rows.push(Record::date_only(date));
            summary.date_only = true;
        }

        table.extend(rows);
        Ok(summary)
    }
}
