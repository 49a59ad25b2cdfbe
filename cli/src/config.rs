//! Run configuration file for `schedule-parse`.
//!
//! # Example YAML
//!
//! ```yaml
//! input: data/test_schedule.inc
//! output: out/schedule.csv
//! parser:
//!   encoding: windows-1251
//!   chunk_size: 65536
//!   on_malformed: skip
//! export:
//!   delimiter: ";"
//!   encoding: utf-8
//!   write_index: false
//! ```

use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use eclipse_schedule_export::CsvOptions;
use eclipse_schedule_parser::ParserConfig;
use serde::{Deserialize, Serialize};

/// Settings for one `schedule-parse` invocation; command-line flags take
/// precedence over values loaded from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub parser: ParserConfig,
    pub export: CsvOptions,
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|err| format!("Failed to open config '{}': {err}", path.display()))?;
        serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| format!("Failed to parse config '{}': {err}", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .map_err(|err| format!("Failed to create '{}': {err}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_yaml::to_writer(&mut writer, self)
            .map_err(|err| format!("Failed to write config '{}': {err}", path.display()))?;
        writer
            .flush()
            .map_err(|err| format!("Failed to write config '{}': {err}", path.display()))
    }

    /// Loads `path` when given, otherwise starts from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, String> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
