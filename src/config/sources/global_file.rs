//! Global config file source: `<config_dir>/phototag/config.toml`.

use crate::config::paths;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::{File, FileFormat};
use tracing::debug;

/// Add the global config file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = match paths::global_config_path() {
        Ok(path) => path,
        Err(e) => {
            debug!("No global config location: {}", e);
            return Ok(builder);
        }
    };

    if !path.exists() {
        debug!(config_path = %path.display(), "Global config file not present");
        return Ok(builder);
    }

    let canonical = dunce::canonicalize(&path).unwrap_or(path);
    debug!(config_path = %canonical.display(), "Using global config file");
    Ok(builder.add_source(File::from(canonical).format(FileFormat::Toml).required(false)))
}
