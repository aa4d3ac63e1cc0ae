//! Image
//!
//! A tracked image file and its tag state machine. Transitions are planned as
//! pure [`NameChange`] values; the catalog performs the physical rename and
//! only then calls [`Image::apply`], so a failed rename never leaves the
//! in-memory state ahead of the disk.

use crate::codec;
use crate::error::CatalogError;
use crate::history::HistoryLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Catalog-assigned identity, stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A planned transition from one name to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameChange {
    pub from: String,
    pub to: String,
    pub tags: Vec<String>,
}

impl NameChange {
    /// True when the file keeps its current name.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    id: ImageId,
    /// Containing directory, relative to the catalog root.
    directory: PathBuf,
    name: String,
    tags: Vec<String>,
    history: HistoryLog,
}

impl Image {
    /// A newly discovered image. Tags already present in `name` are kept, and
    /// the history is seeded with the discovery name.
    pub fn discovered(
        id: ImageId,
        directory: PathBuf,
        name: &str,
        at: DateTime<Utc>,
    ) -> Result<Self, CatalogError> {
        let tags = codec::tags_of(name)?;
        Ok(Self {
            id,
            directory,
            name: name.to_string(),
            tags,
            history: HistoryLog::seeded(name, at),
        })
    }

    /// Reassemble an image from persisted state.
    pub(crate) fn from_parts(
        id: ImageId,
        directory: PathBuf,
        name: String,
        tags: Vec<String>,
        history: HistoryLog,
    ) -> Self {
        Self {
            id,
            directory,
            name,
            tags,
            history,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Path relative to the catalog root.
    pub fn relative_path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// Absolute path under `root`.
    pub fn path_in(&self, root: &Path) -> PathBuf {
        root.join(&self.directory).join(&self.name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| codec::same_tag(t, tag))
    }

    /// Plan appending `tag`. Duplicates are allowed.
    pub fn plan_add_tag(&self, tag: &str) -> Result<NameChange, CatalogError> {
        codec::validate_tag(tag)?;
        let parsed = codec::parse(&self.name)?;
        let mut tags = self.tags.clone();
        tags.push(tag.to_string());
        Ok(NameChange {
            from: self.name.clone(),
            to: parsed.with_tags(&tags),
            tags,
        })
    }

    /// Plan removing the first occurrence of `tag`.
    pub fn plan_delete_tag(&self, tag: &str) -> Result<NameChange, CatalogError> {
        let index = self
            .tags
            .iter()
            .position(|t| codec::same_tag(t, tag))
            .ok_or_else(|| CatalogError::TagNotFound(tag.to_string()))?;
        let parsed = codec::parse(&self.name)?;
        let mut tags = self.tags.clone();
        tags.remove(index);
        Ok(NameChange {
            from: self.name.clone(),
            to: parsed.with_tags(&tags),
            tags,
        })
    }

    /// Plan returning to a name recorded in history. Tags are replaced wholesale
    /// with the ones encoded in `target`.
    pub fn plan_revert(&self, target: &str) -> Result<NameChange, CatalogError> {
        if !self.history.contains(target) {
            return Err(CatalogError::TagNotFound(target.to_string()));
        }
        let tags = codec::tags_of(target)?;
        Ok(NameChange {
            from: self.name.clone(),
            to: target.to_string(),
            tags,
        })
    }

    /// Commit a planned change. Returns true when the resulting name was new
    /// to the history.
    pub fn apply(&mut self, change: NameChange, at: DateTime<Utc>) -> bool {
        let recorded = self.history.record(&change.to, at);
        self.name = change.to;
        self.tags = change.tags;
        recorded
    }

    /// Re-derive tags from the name when they disagree. Returns true if a
    /// repair was needed.
    pub(crate) fn repair_tags(&mut self) -> Result<bool, CatalogError> {
        let derived = codec::tags_of(&self.name)?;
        if derived == self.tags {
            return Ok(false);
        }
        self.tags = derived;
        Ok(true)
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
