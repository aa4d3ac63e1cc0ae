//! Catalog
//!
//! The tracked images of one root directory. Opening a catalog reconciles the
//! saved snapshot with what is on disk; every successful tag operation renames
//! the file, then rewrites the snapshot.
//!
//! A mutation runs in this order: plan, write the rename journal, rename the
//! file, commit in memory, save the snapshot, clear the journal. A failed
//! rename leaves memory untouched. A failed snapshot write leaves the journal
//! behind, and the next [`Catalog::open`] replays it.

use crate::activity::{ActivityLog, Outcome};
use crate::error::{CatalogError, StorageError};
use crate::history::HistoryLog;
use crate::image::{Image, ImageId, NameChange};
use crate::registry::SharedTagRegistry;
use crate::scan::{ScanConfig, Scanner};
use crate::store::journal::RenameOutcome;
use crate::store::{
    CatalogSnapshot, ImageRecord, JsonSnapshotStore, PendingRename, RenameJournal, SnapshotStore,
};
use chrono::Utc;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// How a catalog is opened.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Snapshot file name, relative to the root.
    pub snapshot_file: String,
    pub scan: ScanConfig,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            snapshot_file: crate::store::persistence::DEFAULT_SNAPSHOT_FILE.to_string(),
            scan: ScanConfig::default(),
        }
    }
}

/// What happened while opening a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenReport {
    /// Images restored from the snapshot.
    pub loaded: usize,
    /// Images seen for the first time in this scan.
    pub discovered: usize,
    /// Image files ignored because their names break the tag grammar.
    pub skipped: Vec<PathBuf>,
    /// Snapshot records whose tags were re-derived from their names.
    pub repaired: usize,
    /// Outcome of an interrupted rename found at startup.
    pub recovered: Option<RenameOutcome>,
}

pub struct Catalog {
    root: PathBuf,
    images: Vec<Image>,
    next_id: u64,
    store: Box<dyn SnapshotStore>,
    journal: RenameJournal,
    registry: SharedTagRegistry,
    activity: Option<ActivityLog>,
    report: OpenReport,
}

impl Catalog {
    /// Open the catalog rooted at `root`, using the JSON snapshot inside it.
    pub fn open(
        root: &Path,
        options: &CatalogOptions,
        registry: SharedTagRegistry,
        activity: Option<ActivityLog>,
    ) -> Result<Self, CatalogError> {
        let root = dunce::canonicalize(root).map_err(|e| {
            StorageError::InvalidPath(format!("{}: {}", root.display(), e))
        })?;
        if !root.is_dir() {
            return Err(StorageError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            ))
            .into());
        }
        let store = JsonSnapshotStore::in_root(&root, &options.snapshot_file);
        Self::with_store(root, &options.scan, Box::new(store), registry, activity)
    }

    /// Open with an explicit snapshot store. `root` is used as given.
    pub fn with_store(
        root: PathBuf,
        scan: &ScanConfig,
        store: Box<dyn SnapshotStore>,
        registry: SharedTagRegistry,
        activity: Option<ActivityLog>,
    ) -> Result<Self, CatalogError> {
        let journal = RenameJournal::in_root(&root);
        let mut catalog = Self {
            root,
            images: Vec::new(),
            next_id: 1,
            store,
            journal,
            registry,
            activity,
            report: OpenReport::default(),
        };
        catalog.load(scan)?;
        Ok(catalog)
    }

    fn load(&mut self, scan: &ScanConfig) -> Result<(), CatalogError> {
        let snapshot = self.store.load()?;
        let mut dirty = snapshot.is_none();

        if let Some(snapshot) = snapshot {
            self.next_id = snapshot.next_id;
            let mut seen = HashSet::new();
            let mut claimed = HashSet::new();
            for record in snapshot.images {
                if !seen.insert(record.id) {
                    warn!(id = %record.id, "Duplicate image id in snapshot, keeping the first");
                    dirty = true;
                    continue;
                }
                let relative = record.directory.join(&record.name);
                if !claimed.insert(relative.clone()) {
                    warn!(
                        id = %record.id,
                        path = %relative.display(),
                        "Path already tracked by another image in snapshot, keeping the first"
                    );
                    dirty = true;
                    continue;
                }
                let mut image = record.into_image();
                match image.repair_tags() {
                    Ok(true) => {
                        warn!(image = %image.id(), name = image.name(), "Tags re-derived from file name");
                        self.report.repaired += 1;
                        dirty = true;
                    }
                    Ok(false) => {}
                    Err(e) => warn!(image = %image.id(), "Cannot check tags: {}", e),
                }
                self.images.push(image);
            }
            self.report.loaded = self.images.len();
            let max_id = self.images.iter().map(|i| i.id().0).max().unwrap_or(0);
            self.next_id = self.next_id.max(max_id + 1);
        }

        if self.replay_journal()? {
            dirty = true;
        }

        let mut scanner = Scanner::with_config(self.root.clone(), scan.clone())
            .skip_path(self.journal.path().to_path_buf());
        if let Some(location) = self.store.location() {
            scanner = scanner.skip_path(location.to_path_buf());
        }

        let tracked: HashSet<PathBuf> = self.images.iter().map(Image::relative_path).collect();
        let now = Utc::now();
        for found in scanner.scan()? {
            let relative = found.relative_path();
            if tracked.contains(&relative) {
                continue;
            }
            match Image::discovered(ImageId(self.next_id), found.directory, &found.name, now) {
                Ok(image) => {
                    debug!(image = %image.id(), path = %relative.display(), "Discovered image");
                    self.next_id += 1;
                    self.images.push(image);
                    self.report.discovered += 1;
                    dirty = true;
                }
                Err(e) => {
                    warn!(path = %relative.display(), "Skipping image: {}", e);
                    self.report.skipped.push(relative);
                }
            }
        }

        if dirty {
            self.persist()?;
        }
        info!(
            root = %self.root.display(),
            images = self.images.len(),
            discovered = self.report.discovered,
            "Catalog opened"
        );
        Ok(())
    }

    /// Apply or discard a rename journal left by an interrupted session.
    /// Returns true when the in-memory state changed.
    fn replay_journal(&mut self) -> Result<bool, CatalogError> {
        let pending = match self.journal.read()? {
            Some(pending) => pending,
            None => return Ok(false),
        };

        let outcome = pending.outcome(&self.root);
        self.report.recovered = Some(outcome);
        let mut changed = false;

        match outcome {
            RenameOutcome::Completed => {
                let id = pending.image.id;
                let image = pending.image.into_image();
                match self.images.iter_mut().find(|i| i.id() == id) {
                    Some(slot) => *slot = image,
                    None => {
                        self.next_id = self.next_id.max(id.0 + 1);
                        self.images.push(image);
                    }
                }
                warn!(image = %id, "Recovered rename that was not saved before exit");
                changed = true;
            }
            RenameOutcome::NotStarted => {
                info!(from = %pending.from, "Discarding rename that never happened");
            }
            RenameOutcome::Indeterminate => {
                warn!(
                    from = %pending.from,
                    to = %pending.image.name,
                    "Cannot tell whether an interrupted rename happened; keeping saved state"
                );
            }
        }

        self.journal.clear()?;
        Ok(changed)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn report(&self) -> &OpenReport {
        &self.report
    }

    pub fn registry(&self) -> &SharedTagRegistry {
        &self.registry
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn image(&self, id: ImageId) -> Result<&Image, CatalogError> {
        self.images
            .iter()
            .find(|i| i.id() == id)
            .ok_or(CatalogError::ImageNotFound(id))
    }

    fn index_of(&self, id: ImageId) -> Result<usize, CatalogError> {
        self.images
            .iter()
            .position(|i| i.id() == id)
            .ok_or(CatalogError::ImageNotFound(id))
    }

    /// Full name history of an image.
    pub fn history(&self, id: ImageId) -> Result<&HistoryLog, CatalogError> {
        self.image(id).map(Image::history)
    }

    /// History rendered as `name: <name> , time: <time>` lines.
    pub fn history_text(&self, id: ImageId) -> Result<String, CatalogError> {
        self.history(id).map(HistoryLog::to_text)
    }

    /// Every name the image has carried, oldest first.
    pub fn names(&self, id: ImageId) -> Result<Vec<String>, CatalogError> {
        self.history(id).map(HistoryLog::names)
    }

    /// Tracked images whose file is no longer where the catalog expects it.
    pub fn missing_images(&self) -> Vec<&Image> {
        self.images
            .iter()
            .filter(|i| !i.path_in(&self.root).exists())
            .collect()
    }

    /// Resolve `#<id>`, `<id>`, a path (relative to the root or absolute), or a
    /// bare file name.
    pub fn find(&self, selector: &str) -> Result<&Image, CatalogError> {
        let selector = selector.trim();

        if let Some(id) = parse_id(selector) {
            if let Ok(image) = self.image(id) {
                return Ok(image);
            }
        }

        let path = Path::new(selector);
        let relative = if path.is_absolute() {
            let resolved = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            resolved.strip_prefix(&self.root).ok().map(Path::to_path_buf)
        } else {
            Some(path.to_path_buf())
        };
        if let Some(relative) = relative {
            if let Some(image) = self.images.iter().find(|i| i.relative_path() == relative) {
                return Ok(image);
            }
        }

        let mut by_name = self.images.iter().filter(|i| i.name() == selector);
        match (by_name.next(), by_name.next()) {
            (Some(image), None) => Ok(image),
            (Some(_), Some(_)) => Err(CatalogError::AmbiguousImage(selector.to_string())),
            (None, _) => Err(CatalogError::NoImageMatches(selector.to_string())),
        }
    }

    /// Append `tag` to the image's name. Unseen tags are added to the registry.
    pub fn add_tag(&mut self, id: ImageId, tag: &str) -> Result<&Image, CatalogError> {
        let action = format!("add tag {}", tag);
        let index = self.transition(id, &action, |image| image.plan_add_tag(tag))?;

        let registered = self.registry.write().add(tag);
        if let Err(e) = registered {
            warn!(tag, "Tag applied but could not be registered: {}", e);
        }
        Ok(&self.images[index])
    }

    /// Remove the first occurrence of `tag` from the image's name.
    pub fn delete_tag(&mut self, id: ImageId, tag: &str) -> Result<&Image, CatalogError> {
        let action = format!("delete tag {}", tag);
        let index = self.transition(id, &action, |image| image.plan_delete_tag(tag))?;
        Ok(&self.images[index])
    }

    /// Apply each tag in turn. Not transactional: tags before a failure stay applied.
    pub fn add_tags<S: AsRef<str>>(&mut self, id: ImageId, tags: &[S]) -> Result<&Image, CatalogError> {
        self.index_of(id)?;
        for tag in tags {
            self.add_tag(id, tag.as_ref())?;
        }
        self.image(id)
    }

    /// Delete each tag in turn. Not transactional: tags before a failure stay deleted.
    pub fn delete_tags<S: AsRef<str>>(
        &mut self,
        id: ImageId,
        tags: &[S],
    ) -> Result<&Image, CatalogError> {
        self.index_of(id)?;
        for tag in tags {
            self.delete_tag(id, tag.as_ref())?;
        }
        self.image(id)
    }

    /// Rename the image back to a name from its history.
    pub fn revert(&mut self, id: ImageId, name: &str) -> Result<&Image, CatalogError> {
        let action = format!("revert to {}", name);
        let index = self.transition(id, &action, |image| image.plan_revert(name))?;
        Ok(&self.images[index])
    }

    /// Plan, rename, commit, persist, and record the outcome.
    fn transition<F>(&mut self, id: ImageId, action: &str, plan: F) -> Result<usize, CatalogError>
    where
        F: FnOnce(&Image) -> Result<NameChange, CatalogError>,
    {
        let result = self.index_of(id).and_then(|index| {
            let change = plan(&self.images[index])?;
            let (from, to) = (change.from.clone(), change.to.clone());
            self.commit(index, change)?;
            Ok((index, from, to))
        });

        match result {
            Ok((index, from, to)) => {
                info!(image = %id, from = %from, to = %to, "{}", action);
                self.record_activity(Outcome::Ok, &format!("{} on image {}: {} -> {}", action, id, from, to));
                Ok(index)
            }
            Err(e) => {
                if e.is_not_found() {
                    warn!(image = %id, "{} failed: {}", action, e);
                } else {
                    error!(image = %id, "{} failed: {}", action, e);
                }
                self.record_activity(Outcome::Failed, &format!("{} on image {}: {}", action, id, e));
                Err(e)
            }
        }
    }

    fn commit(&mut self, index: usize, change: NameChange) -> Result<(), CatalogError> {
        let now = Utc::now();
        let mut intended = self.images[index].clone();

        if change.is_noop() {
            intended.apply(change, now);
            self.images[index] = intended;
            return self.persist();
        }

        let dir = self.root.join(intended.directory());
        let from_path = dir.join(&change.from);
        let to_path = dir.join(&change.to);
        let claimed = self.images.iter().enumerate().any(|(i, other)| {
            i != index && other.directory() == intended.directory() && other.name() == change.to
        });
        if claimed || fs::symlink_metadata(&to_path).is_ok() {
            return Err(CatalogError::NameCollision(to_path));
        }

        let from = change.from.clone();
        intended.apply(change, now);
        self.journal
            .write(&PendingRename::new(&from, ImageRecord::from_image(&intended)))?;

        if let Err(source) = fs::rename(&from_path, &to_path) {
            if let Err(e) = self.journal.clear() {
                warn!("Failed to clear rename journal: {}", e);
            }
            return Err(CatalogError::RenameFailed {
                from: from_path,
                to: to_path,
                source,
            });
        }

        self.images[index] = intended;
        self.persist()?;
        self.journal.clear()?;
        Ok(())
    }

    /// Write the full image list to the snapshot store.
    pub fn persist(&self) -> Result<(), CatalogError> {
        let snapshot = CatalogSnapshot::from_images(self.next_id, &self.images);
        self.store.save(&snapshot)?;
        Ok(())
    }

    fn record_activity(&self, outcome: Outcome, message: &str) {
        if let Some(activity) = &self.activity {
            if let Err(e) = activity.record(outcome, message) {
                warn!("Failed to write activity log: {}", e);
            }
        }
    }
}

fn parse_id(selector: &str) -> Option<ImageId> {
    selector
        .strip_prefix('#')
        .unwrap_or(selector)
        .parse::<u64>()
        .ok()
        .map(ImageId)
}
