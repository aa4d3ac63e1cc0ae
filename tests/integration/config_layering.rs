//! Layered configuration as seen by the application context.

use super::test_utils::{photo_root, with_xdg_env};
use phototag::app::AppContext;
use phototag::config::{ConfigLoader, WORKSPACE_CONFIG_FILE};
use tempfile::TempDir;

#[test]
fn test_default_state_lives_in_xdg_data_home() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["a.jpg"]);

    with_xdg_env(&temp, || {
        let app = AppContext::load(&root, None).unwrap();
        let mut catalog = app.open_catalog(&root).unwrap();
        let id = catalog.images()[0].id();
        catalog.add_tag(id, "@xdg").unwrap();

        let data = temp.path().join("data").join("phototag");
        assert!(data.join("tags.json").exists());
        assert!(data.join("activity.log").exists());
    });
}

#[test]
fn test_workspace_file_renames_snapshot() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["a.jpg"]);
    std::fs::write(
        root.join(WORKSPACE_CONFIG_FILE),
        "[catalog]\nsnapshot_file = \".album.json\"\n",
    )
    .unwrap();

    with_xdg_env(&temp, || {
        let app = AppContext::load(&root, None).unwrap();
        app.open_catalog(&root).unwrap();
        assert!(root.join(".album.json").exists());
        assert!(!root.join(".phototag.json").exists());
    });
}

#[test]
fn test_global_file_sets_data_dir_and_ignores() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["keep.jpg", "raw/skip.jpg"]);
    let custom_data = temp.path().join("custom-data");

    with_xdg_env(&temp, || {
        let global = temp.path().join("config").join("phototag").join("config.toml");
        std::fs::create_dir_all(global.parent().unwrap()).unwrap();
        std::fs::write(
            &global,
            format!(
                "[catalog]\nignore_patterns = [\"raw\"]\n\n[storage]\ndata_dir = {:?}\n",
                custom_data.to_str().unwrap()
            ),
        )
        .unwrap();

        let config = ConfigLoader::load(&root).unwrap();
        assert_eq!(config.catalog.ignore_patterns, vec!["raw"]);
        assert_eq!(config.storage.data_dir.as_deref(), Some(custom_data.as_path()));

        let app = AppContext::new(config).unwrap();
        let catalog = app.open_catalog(&root).unwrap();
        let names: Vec<_> = catalog.images().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["keep.jpg"]);
    });
}

#[test]
fn test_explicit_config_file_is_validated() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("bad.toml");
    std::fs::write(&file, "[storage]\nregistry_file = \"\"\n").unwrap();
    assert!(ConfigLoader::load_from_file(&file).is_err());
    assert!(ConfigLoader::load_from_file(&temp.path().join("absent.toml")).is_err());
}
