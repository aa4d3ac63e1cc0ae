//! Platform directories for per-user phototag state.
//!
//! Linux follows XDG (`$XDG_CONFIG_HOME/phototag`, `$XDG_DATA_HOME/phototag`);
//! other platforms use their native conventions.

use crate::error::CatalogError;
use directories::ProjectDirs;
use std::path::PathBuf;

const APPLICATION: &str = "phototag";

fn project_dirs() -> Result<ProjectDirs, CatalogError> {
    ProjectDirs::from("", "", APPLICATION).ok_or_else(|| {
        CatalogError::ConfigError(
            "Could not determine a home directory for phototag state".to_string(),
        )
    })
}

/// Directory holding the global `config.toml`.
pub fn config_dir() -> Result<PathBuf, CatalogError> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Directory holding the tag registry and activity log.
pub fn data_dir() -> Result<PathBuf, CatalogError> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

pub fn global_config_path() -> Result<PathBuf, CatalogError> {
    Ok(config_dir()?.join("config.toml"))
}
