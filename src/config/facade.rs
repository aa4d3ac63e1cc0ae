//! Entry points for loading configuration.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::PhotoTagConfig;
use crate::error::CatalogError;
use config::{Environment, File, FileFormat};
use std::path::Path;

/// Environment variable prefix; `PHOTOTAG__CATALOG__MAX_DEPTH=3` sets `catalog.max_depth`.
const ENV_PREFIX: &str = "PHOTOTAG";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the layered configuration for the catalog rooted at `root`.
    ///
    /// Precedence, lowest first: defaults, global config file, `<root>/.phototag.toml`,
    /// `PHOTOTAG__*` environment variables.
    pub fn load(root: &Path) -> Result<PhotoTagConfig, CatalogError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, root)?;
        let builder = builder.add_source(Self::environment());

        let config: PhotoTagConfig = builder.build()?.try_deserialize()?;
        config.validated()
    }

    /// Load configuration from one explicit file, still honoring environment overrides.
    pub fn load_from_file(path: &Path) -> Result<PhotoTagConfig, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config: PhotoTagConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;
        config.validated()
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }
}
