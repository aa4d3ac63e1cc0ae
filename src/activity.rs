//! Activity log: an append-only, human-readable record of every tag and rename
//! operation, successful or not. It is only ever displayed, never parsed back.

use crate::error::StorageError;
use chrono::{SecondsFormat, Utc};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default activity log file name inside the data directory.
pub const DEFAULT_ACTIVITY_FILE: &str = "activity.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok => f.write_str("OK"),
            Outcome::Failed => f.write_str("FAILED"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `<timestamp> <OK|FAILED> <message>` line.
    pub fn record(&self, outcome: Outcome, message: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // Messages are single-line; embedded newlines would break `tail`.
        let message = message.replace('\n', " ");
        writeln!(
            file,
            "{} {} {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            outcome,
            message
        )?;
        Ok(())
    }

    /// Whole log text; empty when nothing was recorded yet.
    pub fn contents(&self) -> Result<String, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    /// The last `n` lines.
    pub fn tail(&self, n: usize) -> Result<Vec<String>, StorageError> {
        let text = self.contents()?;
        let lines: Vec<&str> = text.lines().collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].iter().map(|l| l.to_string()).collect())
    }
}
