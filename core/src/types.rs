//! Record type definitions for well-connection schedules.
//!
//! This module defines the data model produced by the schedule parser: the
//! keyword vocabulary, the decoded field [`Value`], the positional
//! [`Connection`] entry and the dated [`Record`] row. Column order is fixed by
//! [`COLUMN_NAMES`] and every row renders to exactly that many cells.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder token substituted for `N*` repeat-count shorthand.
pub const DEFAULT_MARKER: &str = "DEFAULT";

/// Terminal marker line; no further dated sections follow it.
pub const END_MARKER: &str = "END";

/// Record terminator token.
pub const RECORD_TERMINATOR: &str = "/";

/// Number of token-consuming columns in a COMPDAT line.
pub const CONNECTION_FIELDS: usize = 14;

/// Position of the Date column in [`COLUMN_NAMES`].
pub const DATE_COLUMN: usize = 0;

/// Position of the Local grid name column in [`COLUMN_NAMES`].
pub const LOCAL_GRID_COLUMN: usize = 2;

/// Output column schema, in order.
pub const COLUMN_NAMES: [&str; 16] = [
    "Date",
    "Well name",
    "Local grid name",
    "I",
    "J",
    "K upper",
    "K lower",
    "Flag on connection",
    "Saturation table",
    "Transmissibility factor",
    "Well bore diameter",
    "Effective Kh",
    "Skin factor",
    "D-factor",
    "Dir_well_penetrates_grid_block",
    "Press_eq_radius",
];

/// Section keywords that carry data the parser extracts.
///
/// # Examples
///
/// ```
/// use eclipse_schedule_core::Keyword;
///
/// assert_eq!(Keyword::from_header("COMPDATL"), Some(Keyword::Compdatl));
/// assert_eq!(Keyword::from_header("compdat"), None);
/// assert_eq!(Keyword::Compdat.token_count(), Some(14));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Keyword {
    /// `DATES`: report dates for the following sections.
    Dates,
    /// `COMPDAT`: well connections in the global grid.
    Compdat,
    /// `COMPDATL`: well connections in a local grid refinement.
    Compdatl,
}

impl Keyword {
    /// All tracked keywords, in classification order.
    pub const ALL: [Keyword; 3] = [Keyword::Dates, Keyword::Compdat, Keyword::Compdatl];

    /// Header text as it appears in the deck.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Dates => "DATES",
            Keyword::Compdat => "COMPDAT",
            Keyword::Compdatl => "COMPDATL",
        }
    }

    /// Matches a header line exactly (case-sensitive, no surrounding text).
    pub fn from_header(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|keyword| keyword.as_str() == line)
    }

    /// Number of whitespace-separated tokens a record line of this keyword
    /// must carry, or `None` for keywords that do not produce connections.
    pub fn token_count(self) -> Option<usize> {
        match self {
            Keyword::Dates => None,
            Keyword::Compdat => Some(CONNECTION_FIELDS),
            Keyword::Compdatl => Some(CONNECTION_FIELDS + 1),
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded positional field: numeric when the token parses as a float,
/// otherwise the literal token (default markers, status flags, names).
///
/// # Examples
///
/// ```
/// use eclipse_schedule_core::Value;
///
/// assert_eq!(Value::parse("10"), Value::Number(10.0));
/// assert_eq!(Value::parse("OPEN"), Value::Text("OPEN".into()));
/// assert!(Value::parse("DEFAULT").is_default());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Converts a token, keeping it verbatim when it is not a float.
    pub fn parse(token: &str) -> Self {
        match token.parse::<f64>() {
            Ok(number) => Value::Number(number),
            Err(_) => Value::Text(token.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Text(text) => Some(text),
        }
    }

    /// Returns `true` for the literal [`DEFAULT_MARKER`].
    pub fn is_default(&self) -> bool {
        self.as_str() == Some(DEFAULT_MARKER)
    }
}

/// Magnitudes outside `[1e-4, 1e16)` are rendered in exponent form.
fn needs_exponent(number: f64) -> bool {
    number.is_finite() && number != 0.0 && !(1e-4..1e16).contains(&number.abs())
}

/// Writes `number` with a signed exponent of at least two digits (`1e-07`).
fn write_exponent(f: &mut fmt::Formatter<'_>, number: f64) -> fmt::Result {
    let formatted = format!("{number:e}");
    let parts = formatted
        .split_once('e')
        .and_then(|(mantissa, exponent)| Some((mantissa, exponent.parse::<i32>().ok()?)));
    match parts {
        Some((mantissa, exponent)) => {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs())
        }
        None => f.write_str(&formatted),
    }
}

impl fmt::Display for Value {
    /// Integral numbers keep one decimal place (`10.0`) and very small or
    /// very large magnitudes use exponent form (`1e-07`), matching how float
    /// columns are rendered in tabular exports.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(number) if needs_exponent(*number) => write_exponent(f, *number),
            Value::Number(number) if number.is_finite() && number.fract() == 0.0 => {
                write!(f, "{number:.1}")
            }
            Value::Number(number) => write!(f, "{number}"),
            Value::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Value {
    fn from(token: &str) -> Self {
        Value::parse(token)
    }
}

/// One well-connection entry decoded from a COMPDAT or COMPDATL line.
///
/// Field names follow the column schema; `local_grid` is populated only for
/// COMPDATL entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Keyword section the line was read from.
    pub source: Keyword,
    pub well: Value,
    pub local_grid: Option<String>,
    pub i: Value,
    pub j: Value,
    pub k_upper: Value,
    pub k_lower: Value,
    /// Connection status flag (`OPEN`, `SHUT`, `AUTO`).
    pub status: Value,
    pub saturation_table: Value,
    pub transmissibility: Value,
    pub well_bore_diameter: Value,
    pub effective_kh: Value,
    pub skin: Value,
    pub d_factor: Value,
    pub direction: Value,
    pub pressure_eq_radius: Value,
}

impl Connection {
    /// Builds a connection from the token-consuming columns in schema order
    /// (every column except Date and Local grid name).
    ///
    /// # Examples
    ///
    /// ```
    /// use eclipse_schedule_core::{Connection, Keyword, Value};
    ///
    /// let values = "W1 10 10 1 3 OPEN DEFAULT 1 2 1 DEFAULT DEFAULT DEFAULT 1.0"
    ///     .split(' ')
    ///     .map(Value::parse)
    ///     .collect::<Vec<_>>();
    /// let connection =
    ///     Connection::from_positional(Keyword::Compdat, None, values.try_into().unwrap());
    /// assert_eq!(connection.well, Value::Text("W1".into()));
    /// assert_eq!(connection.k_lower, Value::Number(3.0));
    /// ```
    pub fn from_positional(
        source: Keyword,
        local_grid: Option<String>,
        values: [Value; CONNECTION_FIELDS],
    ) -> Self {
        let [
            well,
            i,
            j,
            k_upper,
            k_lower,
            status,
            saturation_table,
            transmissibility,
            well_bore_diameter,
            effective_kh,
            skin,
            d_factor,
            direction,
            pressure_eq_radius,
        ] = values;
        Self {
            source,
            well,
            local_grid,
            i,
            j,
            k_upper,
            k_lower,
            status,
            saturation_table,
            transmissibility,
            well_bore_diameter,
            effective_kh,
            skin,
            d_factor,
            direction,
            pressure_eq_radius,
        }
    }
}

/// One output row: a connection tagged with its effective date, or a
/// date-only row when a dated block produced no connections.
///
/// # Examples
///
/// ```
/// use eclipse_schedule_core::{Record, COLUMN_NAMES};
///
/// let row = Record::date_only(Some("01 JUN 2018".into()));
/// let cells = row.cells();
/// assert_eq!(cells.len(), COLUMN_NAMES.len());
/// assert!(cells[1..].iter().all(Option::is_none));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: Option<String>,
    pub connection: Option<Connection>,
}

impl Record {
    pub fn new(date: Option<String>, connection: Connection) -> Self {
        Self {
            date,
            connection: Some(connection),
        }
    }

    pub fn date_only(date: Option<String>) -> Self {
        Self {
            date,
            connection: None,
        }
    }

    pub fn is_date_only(&self) -> bool {
        self.connection.is_none()
    }

    pub fn well(&self) -> Option<&Value> {
        self.connection.as_ref().map(|c| &c.well)
    }

    pub fn local_grid(&self) -> Option<&str> {
        self.connection.as_ref().and_then(|c| c.local_grid.as_deref())
    }

    /// Renders the row in [`COLUMN_NAMES`] order; `None` marks a null cell.
    pub fn cells(&self) -> Vec<Option<Value>> {
        let mut cells = Vec::with_capacity(COLUMN_NAMES.len());
        cells.push(self.date.clone().map(Value::Text));
        match &self.connection {
            None => cells.resize(COLUMN_NAMES.len(), None),
            Some(c) => {
                cells.push(Some(c.well.clone()));
                cells.push(c.local_grid.clone().map(Value::Text));
                cells.extend(
                    [
                        &c.i,
                        &c.j,
                        &c.k_upper,
                        &c.k_lower,
                        &c.status,
                        &c.saturation_table,
                        &c.transmissibility,
                        &c.well_bore_diameter,
                        &c.effective_kh,
                        &c.skin,
                        &c.d_factor,
                        &c.direction,
                        &c.pressure_eq_radius,
                    ]
                    .into_iter()
                    .map(|value| Some(value.clone())),
                );
            }
        }
        cells
    }
}
