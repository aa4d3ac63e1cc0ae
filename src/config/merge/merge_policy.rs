//! Merge rules: scalar defaults seeded into the builder, later sources override.
//!
//! Only keys that every later layer may override partially are seeded here;
//! whole-section defaults come from the serde defaults on the config types.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default(
            "catalog.snapshot_file",
            crate::store::persistence::DEFAULT_SNAPSHOT_FILE,
        )?
        .set_default("catalog.follow_symlinks", false)?
        .set_default("storage.registry_file", crate::registry::DEFAULT_REGISTRY_FILE)?
        .set_default(
            "storage.activity_log_file",
            crate::activity::DEFAULT_ACTIVITY_FILE,
        )?
        .set_default("logging.level", "info")
}
