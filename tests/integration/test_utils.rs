//! Shared test utilities for integration tests
//!
//! Provides setup for isolated XDG directories and catalog fixtures.

use phototag::app::AppContext;
use phototag::config::{PhotoTagConfig, StorageConfig};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize XDG environment variable access across all tests
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(&'static str, Option<String>)>,
}

const ISOLATED_VARS: [&str; 3] = ["HOME", "XDG_CONFIG_HOME", "XDG_DATA_HOME"];

impl EnvState {
    fn capture() -> Self {
        Self {
            saved: ISOLATED_VARS
                .iter()
                .map(|k| (*k, std::env::var(k).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (key, value) in self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

/// Run `f` with HOME, XDG_CONFIG_HOME and XDG_DATA_HOME pointing into `test_dir`.
///
/// Config lands in `<test_dir>/config/phototag`, data in `<test_dir>/data/phototag`.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let config_home = test_dir.path().join("config");
    let data_home = test_dir.path().join("data");
    let home = test_dir.path().join("home");
    for dir in [&config_home, &data_home, &home] {
        std::fs::create_dir_all(dir).unwrap();
    }

    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);
    std::env::set_var("XDG_DATA_HOME", &data_home);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    env_state.restore();
    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Application context whose per-user state lives in `<test_dir>/state`.
pub fn app_in(test_dir: &TempDir) -> AppContext {
    let config = PhotoTagConfig {
        storage: StorageConfig {
            data_dir: Some(state_dir(test_dir)),
            ..StorageConfig::default()
        },
        ..PhotoTagConfig::default()
    };
    AppContext::new(config).unwrap()
}

pub fn state_dir(test_dir: &TempDir) -> PathBuf {
    test_dir.path().join("state")
}

/// Create `<test_dir>/photos` holding the given (empty) image files.
pub fn photo_root(test_dir: &TempDir, files: &[&str]) -> PathBuf {
    let root = test_dir.path().join("photos");
    std::fs::create_dir_all(&root).unwrap();
    for file in files {
        write_image(&root, file);
    }
    root
}

pub fn write_image(dir: &Path, relative: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"not really an image").unwrap();
}
