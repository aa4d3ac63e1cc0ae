//! Configuration System
//!
//! Layered configuration: built-in defaults, then the user's global config file,
//! then `.phototag.toml` in the catalog root, then `PHOTOTAG__*` environment
//! variables. Tests included.

use crate::catalog::CatalogOptions;
use crate::error::CatalogError;
use crate::logging::LoggingConfig;
use crate::scan::ScanConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

/// Name of the per-catalog config file, relative to the root.
pub const WORKSPACE_CONFIG_FILE: &str = ".phototag.toml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoTagConfig {
    /// Catalog and scanning settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Where per-user state lives
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Snapshot file written at the catalog root
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,

    /// Follow symbolic links while scanning
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Maximum scan depth (unset = unlimited)
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Directory or file names skipped while scanning
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

fn default_snapshot_file() -> String {
    crate::store::persistence::DEFAULT_SNAPSHOT_FILE.to_string()
}

fn default_ignore_patterns() -> Vec<String> {
    ScanConfig::default().ignore_patterns
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            snapshot_file: default_snapshot_file(),
            follow_symlinks: false,
            max_depth: None,
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

impl CatalogConfig {
    pub fn to_options(&self) -> CatalogOptions {
        CatalogOptions {
            snapshot_file: self.snapshot_file.clone(),
            scan: ScanConfig {
                follow_symlinks: self.follow_symlinks,
                ignore_patterns: self.ignore_patterns.clone(),
                max_depth: self.max_depth,
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_file_name(&self.snapshot_file, "snapshot_file")?;
        if self.max_depth == Some(0) {
            return Err("max_depth must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the tag registry and activity log (default: platform data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Tag registry file name inside the data directory
    #[serde(default = "default_registry_file")]
    pub registry_file: String,

    /// Activity log file name inside the data directory
    #[serde(default = "default_activity_log_file")]
    pub activity_log_file: String,
}

fn default_registry_file() -> String {
    crate::registry::DEFAULT_REGISTRY_FILE.to_string()
}

fn default_activity_log_file() -> String {
    crate::activity::DEFAULT_ACTIVITY_FILE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            registry_file: default_registry_file(),
            activity_log_file: default_activity_log_file(),
        }
    }
}

impl StorageConfig {
    /// Configured data directory, or the platform one.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, CatalogError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::data_dir(),
        }
    }

    pub fn registry_path(&self) -> Result<PathBuf, CatalogError> {
        Ok(self.resolve_data_dir()?.join(&self.registry_file))
    }

    pub fn activity_log_path(&self) -> Result<PathBuf, CatalogError> {
        Ok(self.resolve_data_dir()?.join(&self.activity_log_file))
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_file_name(&self.registry_file, "registry_file")?;
        validate_file_name(&self.activity_log_file, "activity_log_file")?;
        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                return Err("data_dir cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

fn validate_file_name(name: &str, field: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(format!("{} must be a file name, not a path", field));
    }
    Ok(())
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Catalog(String),
    Storage(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Catalog(msg) => write!(f, "catalog: {}", msg),
            ValidationError::Storage(msg) => write!(f, "storage: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl PhotoTagConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.catalog.validate() {
            errors.push(ValidationError::Catalog(e));
        }
        if let Err(e) = self.storage.validate() {
            errors.push(ValidationError::Storage(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every problem into one error.
    pub fn validated(self) -> Result<Self, CatalogError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            CatalogError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    /// Effective configuration rendered as TOML.
    pub fn to_toml(&self) -> Result<String, CatalogError> {
        toml::to_string_pretty(self)
            .map_err(|e| CatalogError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
