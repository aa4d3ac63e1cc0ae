//! Tag registry persistence and its interaction with catalogs.

use super::test_utils::{app_in, photo_root, state_dir};
use phototag::error::CatalogError;
use phototag::registry::TagRegistry;
use tempfile::TempDir;

#[test]
fn test_add_tag_registers_once() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["a.jpg", "b.jpg"]);
    let app = app_in(&temp);
    let mut catalog = app.open_catalog(&root).unwrap();
    let ids: Vec<_> = catalog.images().iter().map(|i| i.id()).collect();

    catalog.add_tag(ids[0], "@x").unwrap();
    catalog.add_tag(ids[1], "@x").unwrap();
    catalog.add_tag(ids[1], "@y").unwrap();

    let on_disk = TagRegistry::open(state_dir(&temp).join("tags.json")).unwrap();
    assert_eq!(on_disk.all(), ["@x", "@y"]);
}

#[test]
fn test_registry_removal_does_not_touch_images() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["a.jpg"]);
    let app = app_in(&temp);
    let mut catalog = app.open_catalog(&root).unwrap();
    let id = catalog.images()[0].id();
    catalog.add_tag(id, "@keep").unwrap();

    app.registry().write().remove("@keep").unwrap();
    assert!(matches!(
        app.registry().write().remove("@keep"),
        Err(CatalogError::TagNotFound(_))
    ));

    assert_eq!(catalog.image(id).unwrap().tags(), ["@keep"]);
    // Deleting an unregistered tag from an image still works.
    catalog.delete_tag(id, "@keep").unwrap();
    assert_eq!(catalog.image(id).unwrap().name(), "a.jpg");
}

#[test]
fn test_registry_is_shared_across_roots() {
    let temp = TempDir::new().unwrap();
    let first = photo_root(&temp, &["a.jpg"]);
    let second = temp.path().join("other");
    std::fs::create_dir_all(&second).unwrap();
    std::fs::write(second.join("z.png"), b"x").unwrap();

    let app = app_in(&temp);
    let mut one = app.open_catalog(&first).unwrap();
    let id = one.images()[0].id();
    one.add_tag(id, "@shared").unwrap();

    let two = app.open_catalog(&second).unwrap();
    assert!(two.registry().read().contains("@shared"));
}
