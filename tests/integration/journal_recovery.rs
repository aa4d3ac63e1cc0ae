//! Reconciling a rename that was interrupted before the snapshot was saved.

use super::test_utils::{app_in, photo_root};
use chrono::Utc;
use phototag::store::journal::RenameOutcome;
use phototag::store::{ImageRecord, PendingRename, RenameJournal};
use std::path::Path;
use tempfile::TempDir;

/// Leave behind exactly what a crash between rename and snapshot write would.
fn interrupted_add_tag(app: &phototag::app::AppContext, root: &Path, tag: &str, do_rename: bool) {
    let catalog = app.open_catalog(root).unwrap();
    let mut image = catalog.images()[0].clone();
    let from = image.name().to_string();
    let change = image.plan_add_tag(tag).unwrap();
    image.apply(change, Utc::now());

    RenameJournal::in_root(catalog.root())
        .write(&PendingRename::new(&from, ImageRecord::from_image(&image)))
        .unwrap();
    if do_rename {
        std::fs::rename(root.join(&from), root.join(image.name())).unwrap();
    }
}

#[test]
fn test_completed_rename_is_adopted() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["dog.jpg"]);
    let app = app_in(&temp);
    interrupted_add_tag(&app, &root, "@park", true);

    let catalog = app.open_catalog(&root).unwrap();
    assert_eq!(catalog.report().recovered, Some(RenameOutcome::Completed));
    assert_eq!(catalog.len(), 1);
    let image = &catalog.images()[0];
    assert_eq!(image.name(), "dog@park.jpg");
    assert_eq!(image.tags(), ["@park"]);
    assert!(image.history().contains("dog.jpg"));
    assert!(!root.join(".phototag.pending.json").exists());

    // The recovered state was saved: a further open sees nothing to replay.
    let again = app.open_catalog(&root).unwrap();
    assert_eq!(again.report().recovered, None);
    assert_eq!(again.images()[0].name(), "dog@park.jpg");
}

#[test]
fn test_rename_that_never_happened_is_discarded() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["dog.jpg"]);
    let app = app_in(&temp);
    interrupted_add_tag(&app, &root, "@park", false);

    let catalog = app.open_catalog(&root).unwrap();
    assert_eq!(catalog.report().recovered, Some(RenameOutcome::NotStarted));
    let image = &catalog.images()[0];
    assert_eq!(image.name(), "dog.jpg");
    assert!(image.tags().is_empty());
    assert!(!image.history().contains("dog@park.jpg"));
    assert!(!root.join(".phototag.pending.json").exists());
}

#[test]
fn test_rename_with_neither_name_on_disk_keeps_saved_state() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["dog.jpg"]);
    let app = app_in(&temp);
    interrupted_add_tag(&app, &root, "@park", false);
    std::fs::remove_file(root.join("dog.jpg")).unwrap();

    let catalog = app.open_catalog(&root).unwrap();
    assert_eq!(catalog.report().recovered, Some(RenameOutcome::Indeterminate));
    assert_eq!(catalog.len(), 1);
    let image = &catalog.images()[0];
    assert_eq!(image.name(), "dog.jpg");
    assert!(image.tags().is_empty());
    assert!(!image.history().contains("dog@park.jpg"));
    assert!(!root.join(".phototag.pending.json").exists());
}

#[test]
fn test_rename_with_both_names_on_disk_keeps_saved_state() {
    let temp = TempDir::new().unwrap();
    let root = photo_root(&temp, &["dog.jpg"]);
    let app = app_in(&temp);
    interrupted_add_tag(&app, &root, "@park", false);
    std::fs::write(root.join("dog@park.jpg"), b"other").unwrap();

    let catalog = app.open_catalog(&root).unwrap();
    assert_eq!(catalog.report().recovered, Some(RenameOutcome::Indeterminate));
    let original = catalog.find("dog.jpg").unwrap();
    assert!(original.tags().is_empty());
    assert!(!original.history().contains("dog@park.jpg"));
    // The second file is picked up as an image of its own.
    let other = catalog.find("dog@park.jpg").unwrap();
    assert_ne!(other.id(), original.id());
    assert!(!root.join(".phototag.pending.json").exists());
}
