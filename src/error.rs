//! Error types for the phototag naming engine.

use crate::image::ImageId;
use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors (snapshots, registry file, journal, activity log)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to (de)serialize {what}: {message}")]
    Serialization { what: String, message: String },

    #[error("Unsupported {what} version: {version}")]
    UnsupportedVersion { what: String, version: u32 },

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl StorageError {
    pub(crate) fn serialization(what: &str, err: impl std::fmt::Display) -> Self {
        StorageError::Serialization {
            what: what.to_string(),
            message: err.to_string(),
        }
    }
}

/// Errors surfaced by catalog, image and registry operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Image not found: {0}")]
    ImageNotFound(ImageId),

    #[error("No image matches '{0}'")]
    NoImageMatches(String),

    #[error("'{0}' matches more than one image; use the id or a relative path")]
    AmbiguousImage(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Invalid tag '{tag}': {reason}")]
    InvalidTag { tag: String, reason: String },

    #[error("Invalid file name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Cannot rename to {0:?}: a different file already exists there")]
    NameCollision(PathBuf),

    #[error("Failed to rename {from:?} to {to:?}: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CatalogError {
    pub(crate) fn invalid_tag(tag: &str, reason: &str) -> Self {
        CatalogError::InvalidTag {
            tag: tag.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_name(name: &str, reason: &str) -> Self {
        CatalogError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for the two recoverable domain conditions the UI turns into messages.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::ImageNotFound(_)
                | CatalogError::NoImageMatches(_)
                | CatalogError::TagNotFound(_)
        )
    }
}

impl From<config::ConfigError> for CatalogError {
    fn from(err: config::ConfigError) -> Self {
        CatalogError::ConfigError(err.to_string())
    }
}
