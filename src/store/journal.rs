//! Write-ahead record of an in-flight rename.
//!
//! The journal is written before a physical rename and removed once the
//! snapshot reflecting it has been saved. A journal found at startup means the
//! previous session stopped between the two steps.

use crate::error::StorageError;
use crate::store::{check_version, read_json, write_json, ImageRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const JOURNAL_VERSION: u32 = 1;

/// Default journal file name, relative to the catalog root.
pub const DEFAULT_JOURNAL_FILE: &str = ".phototag.pending.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRename {
    pub version: u32,
    /// Name the file had before the rename.
    pub from: String,
    /// Image state once the rename has happened.
    pub image: ImageRecord,
}

/// What the filesystem says about a pending rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The file carries the new name.
    Completed,
    /// The file still carries the old name.
    NotStarted,
    /// Neither or both names exist.
    Indeterminate,
}

impl PendingRename {
    pub fn new(from: &str, image: ImageRecord) -> Self {
        Self {
            version: JOURNAL_VERSION,
            from: from.to_string(),
            image,
        }
    }

    /// Inspect the catalog root to decide whether the rename took place.
    pub fn outcome(&self, root: &Path) -> RenameOutcome {
        let dir = root.join(&self.image.directory);
        let target_exists = dir.join(&self.image.name).exists();
        let source_exists = dir.join(&self.from).exists();

        match (source_exists, target_exists) {
            (_, true) if self.from == self.image.name => RenameOutcome::Completed,
            (false, true) => RenameOutcome::Completed,
            (true, false) => RenameOutcome::NotStarted,
            _ => RenameOutcome::Indeterminate,
        }
    }
}

pub struct RenameJournal {
    path: PathBuf,
}

impl RenameJournal {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn in_root(root: &Path) -> Self {
        Self::new(root.join(DEFAULT_JOURNAL_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, pending: &PendingRename) -> Result<(), StorageError> {
        write_json(&self.path, "rename journal", pending)
    }

    pub fn read(&self) -> Result<Option<PendingRename>, StorageError> {
        if !check_version(&self.path, "rename journal", JOURNAL_VERSION)? {
            return Ok(None);
        }
        read_json(&self.path, "rename journal")
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }
}
