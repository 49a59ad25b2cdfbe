//! Input file contract checks.

use std::path::{Path, PathBuf};

use crate::error::InvalidInput;

/// Extension every schedule include file must carry.
pub const SCHEDULE_EXTENSION: &str = "inc";

/// A path that has passed the schedule input contract: it is an existing
/// regular file, has the `.inc` extension and is not empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleInput {
    path: PathBuf,
    size: u64,
}

impl ScheduleInput {
    /// Checks the contract using file metadata only; no content is read.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvalidInput`] violation found, checked in the
    /// order: not a file, wrong extension, empty.
    pub fn check(path: impl AsRef<Path>) -> Result<Self, InvalidInput> {
        let path = path.as_ref();
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Err(InvalidInput::NotAFile(path.to_path_buf())),
        };

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        if extension != SCHEDULE_EXTENSION {
            return Err(InvalidInput::UnsupportedExtension {
                path: path.to_path_buf(),
                extension,
            });
        }

        if metadata.len() == 0 {
            return Err(InvalidInput::EmptyFile(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes at check time.
    pub fn size(&self) -> u64 {
        self.size
    }
}
