//! Directory scanner: recursively collects image files under a catalog root.

use crate::error::StorageError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Bytes read from a file when its extension says nothing about its type.
const SNIFF_LEN: usize = 64;

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links (default: false)
    pub follow_symlinks: bool,
    /// Directory or file names to skip entirely
    pub ignore_patterns: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            ignore_patterns: vec![".git".to_string()],
            max_depth: None,
        }
    }
}

/// An image file found under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundImage {
    /// Containing directory relative to the root.
    pub directory: PathBuf,
    pub name: String,
}

impl FoundImage {
    pub fn relative_path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }
}

pub struct Scanner {
    root: PathBuf,
    config: ScanConfig,
    skip: Vec<PathBuf>,
}

impl Scanner {
    pub fn new(root: PathBuf) -> Self {
        Self::with_config(root, ScanConfig::default())
    }

    pub fn with_config(root: PathBuf, config: ScanConfig) -> Self {
        Self {
            root,
            config,
            skip: Vec::new(),
        }
    }

    /// Never report `path` (catalog bookkeeping files).
    pub fn skip_path(mut self, path: PathBuf) -> Self {
        self.skip.push(path);
        self
    }

    /// Walk the root and return every image, sorted by relative path.
    pub fn scan(&self) -> Result<Vec<FoundImage>, StorageError> {
        let mut found = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.should_ignore(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // An unreadable subdirectory should not hide the rest of the tree.
                    if e.depth() == 0 {
                        return Err(StorageError::IoError(std::io::Error::new(
                            std::io::ErrorKind::Other,
                            format!("Failed to walk directory {:?}: {}", self.root, e),
                        )));
                    }
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if self.skip.iter().any(|s| s == path) {
                continue;
            }
            if !is_image(path) {
                continue;
            }

            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    warn!("Skipping image with non-UTF8 name: {:?}", path);
                    continue;
                }
            };
            let directory = path
                .parent()
                .and_then(|p| p.strip_prefix(&self.root).ok())
                .map(Path::to_path_buf)
                .unwrap_or_default();

            found.push(FoundImage { directory, name });
        }

        found.sort_by(|a, b| a.relative_path().cmp(&b.relative_path()));
        debug!(root = %self.root.display(), images = found.len(), "Scan complete");
        Ok(found)
    }

    fn should_ignore(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.config
            .ignore_patterns
            .iter()
            .any(|pattern| name == pattern.as_str())
    }
}

/// True when `path` looks like an image: by extension first, then by content.
pub fn is_image(path: &Path) -> bool {
    if let Some(mime) = mime_guess::from_path(path).first() {
        return mime.type_() == mime_guess::mime::IMAGE;
    }
    sniff_image(path)
}

fn sniff_image(path: &Path) -> bool {
    let mut buf = [0u8; SNIFF_LEN];
    let read = File::open(path).and_then(|mut f| f.read(&mut buf));
    match read {
        Ok(n) => infer::is_image(&buf[..n]),
        Err(e) => {
            debug!("Could not read {:?} for type sniffing: {}", path, e);
            false
        }
    }
}
