//! Application context: resolved configuration plus the per-user state shared by
//! every catalog opened in one process.

use crate::activity::ActivityLog;
use crate::catalog::Catalog;
use crate::config::{ConfigLoader, PhotoTagConfig};
use crate::error::CatalogError;
use crate::registry::{SharedTagRegistry, TagRegistry};
use std::path::Path;
use tracing::debug;

pub struct AppContext {
    config: PhotoTagConfig,
    registry: SharedTagRegistry,
    activity: ActivityLog,
}

impl AppContext {
    /// Load configuration for `root` (or from `config_path` when given) and open
    /// the tag registry and activity log it points at.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self, CatalogError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(root)?,
        };
        Self::new(config)
    }

    pub fn new(config: PhotoTagConfig) -> Result<Self, CatalogError> {
        let registry_path = config.storage.registry_path()?;
        let activity_path = config.storage.activity_log_path()?;
        debug!(
            registry = %registry_path.display(),
            activity = %activity_path.display(),
            "Opening per-user state"
        );

        let registry = TagRegistry::open(registry_path)?.into_shared();
        Ok(Self {
            config,
            registry,
            activity: ActivityLog::new(activity_path),
        })
    }

    pub fn config(&self) -> &PhotoTagConfig {
        &self.config
    }

    pub fn registry(&self) -> &SharedTagRegistry {
        &self.registry
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Open (scan and reconcile) the catalog rooted at `root`.
    pub fn open_catalog(&self, root: &Path) -> Result<Catalog, CatalogError> {
        Catalog::open(
            root,
            &self.config.catalog.to_options(),
            self.registry.clone(),
            Some(self.activity.clone()),
        )
    }
}
