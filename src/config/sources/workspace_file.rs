//! Per-catalog config file source: `<root>/.phototag.toml`.

use crate::config::WORKSPACE_CONFIG_FILE;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::{File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Add the catalog's own config file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = root.join(WORKSPACE_CONFIG_FILE);
    if !path.exists() {
        return Ok(builder);
    }
    debug!(config_path = %path.display(), "Using catalog config file");
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)))
}
