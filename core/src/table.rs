//! Append-only result table.

use serde::{Deserialize, Serialize};

use crate::types::{COLUMN_NAMES, Record};

/// Ordered, append-only collection of [`Record`] rows with the fixed
/// [`COLUMN_NAMES`] schema. Row order is discovery order.
///
/// # Examples
///
/// ```
/// use eclipse_schedule_core::{Record, ResultTable};
///
/// let mut table = ResultTable::new();
/// table.push(Record::date_only(Some("01 JUL 2018".into())));
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.columns().len(), 16);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    rows: Vec<Record>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMN_NAMES
    }

    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.rows.extend(records);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    /// Rows that carry a decoded connection.
    pub fn connections(&self) -> impl Iterator<Item = &Record> {
        self.rows.iter().filter(|row| !row.is_date_only())
    }

    /// Distinct dates in first-seen order, skipping undated rows.
    pub fn dates(&self) -> Vec<&str> {
        let mut dates: Vec<&str> = Vec::new();
        for date in self.rows.iter().filter_map(|row| row.date.as_deref()) {
            if !dates.contains(&date) {
                dates.push(date);
            }
        }
        dates
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
