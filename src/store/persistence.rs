//! JSON file implementation of the snapshot store.

use crate::error::StorageError;
use crate::store::{check_version, read_json, write_json, CatalogSnapshot, SnapshotStore, SNAPSHOT_VERSION};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default snapshot file name, relative to the catalog root.
pub const DEFAULT_SNAPSHOT_FILE: &str = ".phototag.json";

/// Snapshot stored as a single JSON document, rewritten in full on every save.
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<root>/<file_name>`.
    pub fn in_root(root: &Path, file_name: &str) -> Self {
        Self::new(root.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> Result<Option<CatalogSnapshot>, StorageError> {
        if !check_version(&self.path, "catalog snapshot", SNAPSHOT_VERSION)? {
            debug!(path = %self.path.display(), "No catalog snapshot yet");
            return Ok(None);
        }
        read_json(&self.path, "catalog snapshot")
    }

    fn save(&self, snapshot: &CatalogSnapshot) -> Result<(), StorageError> {
        write_json(&self.path, "catalog snapshot", snapshot)?;
        debug!(
            path = %self.path.display(),
            images = snapshot.images.len(),
            "Catalog snapshot written"
        );
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
