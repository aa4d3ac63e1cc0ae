//! Catalog Snapshot Store
//!
//! Versioned on-disk schema for a catalog's image list, the storage port the
//! catalog persists through, and the write-ahead journal for renames.

pub mod journal;
pub mod persistence;

pub use journal::{PendingRename, RenameJournal};
pub use persistence::JsonSnapshotStore;

use crate::error::StorageError;
use crate::history::{HistoryEntry, HistoryLog};
use crate::image::{Image, ImageId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One persisted image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: ImageId,
    /// Containing directory relative to the catalog root ("" for the root itself).
    pub directory: PathBuf,
    pub name: String,
    pub tags: Vec<String>,
    pub history: Vec<HistoryEntry>,
}

impl ImageRecord {
    pub fn from_image(image: &Image) -> Self {
        Self {
            id: image.id(),
            directory: image.directory().to_path_buf(),
            name: image.name().to_string(),
            tags: image.tags().to_vec(),
            history: image.history().entries().to_vec(),
        }
    }

    pub fn into_image(self) -> Image {
        let mut history = HistoryLog::from_entries(self.history);
        // Older or hand-edited snapshots may lack the current name.
        if !history.contains(&self.name) {
            history.record(&self.name, chrono::Utc::now());
        }
        Image::from_parts(self.id, self.directory, self.name, self.tags, history)
    }
}

/// Full catalog state as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub version: u32,
    pub next_id: u64,
    pub images: Vec<ImageRecord>,
}

impl CatalogSnapshot {
    pub fn new(next_id: u64, images: Vec<ImageRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            next_id,
            images,
        }
    }

    pub fn from_images<'a>(next_id: u64, images: impl IntoIterator<Item = &'a Image>) -> Self {
        Self::new(next_id, images.into_iter().map(ImageRecord::from_image).collect())
    }
}

/// Storage port for catalog snapshots. Reads and writes are whole-state.
pub trait SnapshotStore {
    /// Load the last saved snapshot, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<CatalogSnapshot>, StorageError>;

    /// Replace the saved snapshot.
    fn save(&self, snapshot: &CatalogSnapshot) -> Result<(), StorageError>;

    /// File backing this store, if any. The scanner skips it.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Write `bytes` to `path` through a temporary sibling and a rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::IoError(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create parent directory {:?}: {}", parent, e),
                ))
            })?;
        }
    }

    let mut temp_name = path
        .file_name()
        .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?
        .to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, bytes).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to write {:?}: {}", temp_path, e),
        ))
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to rename temp file to {:?}: {}", path, e),
        ))
    })
}

/// Serialize `value` as pretty JSON and write it atomically.
pub(crate) fn write_json<T: Serialize>(path: &Path, what: &str, value: &T) -> Result<(), StorageError> {
    let bytes =
        serde_json::to_vec_pretty(value).map_err(|e| StorageError::serialization(what, e))?;
    write_atomic(path, &bytes)
}

/// Read a JSON document, returning `None` when the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(
    path: &Path,
    what: &str,
) -> Result<Option<T>, StorageError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to read {} from {:?}: {}", what, path, e),
            )))
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StorageError::serialization(what, e))
}

/// Version field of a JSON document, checked before full deserialization so
/// that newer files fail with a clear error instead of a field mismatch.
pub(crate) fn check_version(
    path: &Path,
    what: &str,
    supported: u32,
) -> Result<bool, StorageError> {
    #[derive(Deserialize)]
    struct Versioned {
        version: u32,
    }

    match read_json::<Versioned>(path, what)? {
        None => Ok(false),
        Some(v) if v.version == supported => Ok(true),
        Some(v) => Err(StorageError::UnsupportedVersion {
            what: what.to_string(),
            version: v.version,
        }),
    }
}
