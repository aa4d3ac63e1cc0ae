//! Tag registry: the set of known tags offered for reuse, independent of which
//! images carry them. Membership is advisory and never reference-counted.

use crate::codec;
use crate::error::{CatalogError, StorageError};
use crate::store::{check_version, read_json, write_json};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const REGISTRY_VERSION: u32 = 1;

/// Default registry file name inside the data directory.
pub const DEFAULT_REGISTRY_FILE: &str = "tags.json";

/// Registry handle shared between the application context and open catalogs.
pub type SharedTagRegistry = Arc<RwLock<TagRegistry>>;

#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    version: u32,
    tags: Vec<String>,
}

/// Insertion-ordered tag set, saved after every change when file-backed.
#[derive(Debug, Default)]
pub struct TagRegistry {
    tags: Vec<String>,
    path: Option<PathBuf>,
}

impl TagRegistry {
    /// A registry that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the registry stored at `path`, starting empty when the file is absent.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let path = path.into();
        let tags = if check_version(&path, "tag registry", REGISTRY_VERSION)? {
            read_json::<RegistryFile>(&path, "tag registry")?
                .map(|f| f.tags)
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), tags = tags.len(), "Tag registry loaded");

        let mut registry = Self {
            tags: Vec::with_capacity(tags.len()),
            path: Some(path),
        };
        for tag in tags {
            if !registry.tags.contains(&tag) {
                registry.tags.push(tag);
            }
        }
        Ok(registry)
    }

    pub fn into_shared(self) -> SharedTagRegistry {
        Arc::new(RwLock::new(self))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert `tag` if absent, then save. Returns true when it was new.
    pub fn add(&mut self, tag: &str) -> Result<bool, CatalogError> {
        codec::validate_tag(tag)?;
        if self.contains(tag) {
            return Ok(false);
        }
        let mut tags = self.tags.clone();
        tags.push(tag.to_string());
        self.write(&tags)?;
        self.tags = tags;
        info!(tag, "Tag registered");
        Ok(true)
    }

    /// Remove `tag`, then save. Images that carry it are unaffected.
    pub fn remove(&mut self, tag: &str) -> Result<(), CatalogError> {
        let index = self
            .tags
            .iter()
            .position(|t| t == tag)
            .ok_or_else(|| CatalogError::TagNotFound(tag.to_string()))?;
        let mut tags = self.tags.clone();
        tags.remove(index);
        self.write(&tags)?;
        self.tags = tags;
        info!(tag, "Tag removed from registry");
        Ok(())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn all(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// One tag per line.
    pub fn to_text(&self) -> String {
        self.tags.iter().map(|t| format!("{}\n", t)).collect()
    }

    /// Write the registry to its file. No-op for in-memory registries.
    pub fn save(&self) -> Result<(), StorageError> {
        self.write(&self.tags)
    }

    /// Memory only changes after this succeeds.
    fn write(&self, tags: &[String]) -> Result<(), StorageError> {
        match &self.path {
            Some(path) => write_json(
                path,
                "tag registry",
                &RegistryFile {
                    version: REGISTRY_VERSION,
                    tags: tags.to_vec(),
                },
            ),
            None => Ok(()),
        }
    }
}
