//! End-to-end catalog behavior against a real directory tree.

use super::test_utils::{app_in, photo_root, write_image};
use phototag::error::CatalogError;
use phototag::image::ImageId;
use phototag::store::{JsonSnapshotStore, SnapshotStore};
use tempfile::TempDir;

#[test]
fn test_vacation_round_trip() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["vacation.jpg"]);
    let app = app_in(&temp);

    let mut catalog = app.open_catalog(&root).unwrap();
    assert_eq!(catalog.len(), 1);
    let image = &catalog.images()[0];
    let id = image.id();
    assert_eq!(image.name(), "vacation.jpg");
    assert!(image.tags().is_empty());
    assert_eq!(image.history().names(), vec!["vacation.jpg"]);

    let image = catalog.add_tag(id, "@beach").unwrap();
    assert_eq!(image.name(), "vacation@beach.jpg");
    assert_eq!(image.tags(), ["@beach"]);
    assert_eq!(image.history().len(), 2);
    assert!(root.join("vacation@beach.jpg").exists());
    assert!(!root.join("vacation.jpg").exists());

    let image = catalog.delete_tag(id, "@beach").unwrap();
    assert_eq!(image.name(), "vacation.jpg");
    assert!(image.tags().is_empty());
    assert_eq!(image.history().len(), 2);
    assert!(root.join("vacation.jpg").exists());
}

#[test]
fn test_state_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["a.jpg", "trip/b.png"]);
    let app = app_in(&temp);

    let (id, first_seen) = {
        let mut catalog = app.open_catalog(&root).unwrap();
        let id = catalog.find("trip/b.png").unwrap().id();
        catalog.add_tags(id, &["@sea", "@sun"]).unwrap();
        let first_seen = catalog.history(id).unwrap().recorded_at("b.png").unwrap();
        (id, first_seen)
    };

    let catalog = app.open_catalog(&root).unwrap();
    assert_eq!(catalog.report().loaded, 2);
    assert_eq!(catalog.report().discovered, 0);
    let image = catalog.image(id).unwrap();
    assert_eq!(image.name(), "b@sea@sun.png");
    assert_eq!(image.tags(), ["@sea", "@sun"]);
    assert_eq!(
        catalog.names(id).unwrap(),
        vec!["b.png", "b@sea.png", "b@sea@sun.png"]
    );
    assert_eq!(
        catalog.history(id).unwrap().recorded_at("b.png"),
        Some(first_seen)
    );
}

#[test]
fn test_new_files_get_fresh_ids_on_later_open() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["a.jpg"]);
    let app = app_in(&temp);

    let first = app.open_catalog(&root).unwrap().images()[0].id();
    write_image(&root, "b.jpg");

    let catalog = app.open_catalog(&root).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.report().discovered, 1);
    let second = catalog.find("b.jpg").unwrap().id();
    assert!(second > first);
    assert_eq!(catalog.find("a.jpg").unwrap().id(), first);
}

#[test]
fn test_revert_to_earlier_name() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["cat.gif"]);
    let app = app_in(&temp);
    let mut catalog = app.open_catalog(&root).unwrap();
    let id = catalog.images()[0].id();

    catalog.add_tag(id, "@one").unwrap();
    catalog.add_tag(id, "@two").unwrap();
    let image = catalog.revert(id, "cat@one.gif").unwrap();
    assert_eq!(image.name(), "cat@one.gif");
    assert_eq!(image.tags(), ["@one"]);
    assert!(root.join("cat@one.gif").exists());
    assert_eq!(image.history().len(), 3);
}

#[test]
fn test_failures_leave_state_and_snapshot_alone() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["a.jpg"]);
    let app = app_in(&temp);
    let mut catalog = app.open_catalog(&root).unwrap();
    let id = catalog.images()[0].id();

    let snapshot_path = root.join(".phototag.json");
    let before = std::fs::read_to_string(&snapshot_path).unwrap();

    assert!(matches!(
        catalog.delete_tag(id, "@never"),
        Err(CatalogError::TagNotFound(_))
    ));
    assert!(matches!(
        catalog.add_tag(ImageId(999), "@x"),
        Err(CatalogError::ImageNotFound(ImageId(999)))
    ));
    assert!(matches!(
        catalog.revert(id, "other.jpg"),
        Err(CatalogError::TagNotFound(_))
    ));

    assert_eq!(catalog.image(id).unwrap().name(), "a.jpg");
    assert_eq!(std::fs::read_to_string(&snapshot_path).unwrap(), before);

    let failures = app.activity().contents().unwrap();
    assert_eq!(failures.lines().filter(|l| l.contains(" FAILED ")).count(), 3);
}

#[test]
fn test_missing_files_stay_tracked() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["a.jpg", "b.jpg"]);
    let app = app_in(&temp);
    app.open_catalog(&root).unwrap();

    std::fs::remove_file(root.join("b.jpg")).unwrap();
    let catalog = app.open_catalog(&root).unwrap();
    assert_eq!(catalog.len(), 2);
    let missing: Vec<_> = catalog.missing_images().iter().map(|i| i.name()).collect();
    assert_eq!(missing, vec!["b.jpg"]);
}

#[test]
fn test_snapshot_uses_named_versioned_schema() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["x.png"]);
    let app = app_in(&temp);
    let mut catalog = app.open_catalog(&root).unwrap();
    let id = catalog.images()[0].id();
    catalog.add_tag(id, "@k").unwrap();

    let store = JsonSnapshotStore::in_root(catalog.root(), ".phototag.json");
    let snapshot = store.load().unwrap().unwrap();
    assert_eq!(snapshot.version, 1);
    assert_eq!(snapshot.images.len(), 1);
    assert_eq!(snapshot.images[0].name, "x@k.png");
    assert_eq!(snapshot.images[0].tags, vec!["@k"]);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(root.join(".phototag.json")).unwrap())
            .unwrap();
    assert_eq!(raw["version"], 1);
    assert_eq!(raw["images"][0]["history"][1]["name"], "x@k.png");
}

#[test]
fn test_pre_tagged_and_malformed_names_on_discovery() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["copied@red@car.jpg", "broken@.jpg"]);
    let app = app_in(&temp);
    let catalog = app.open_catalog(&root).unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.images()[0].tags(), ["@red", "@car"]);
    assert_eq!(catalog.report().skipped.len(), 1);
}
