//! Per-image name history: every name an image has carried, with the time it
//! was first recorded. Entries are never removed.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Display format for history timestamps.
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only name → first-seen timestamp mapping, kept in recording order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log holding just the name an image was discovered with.
    pub fn seeded(name: &str, at: DateTime<Utc>) -> Self {
        let mut log = Self::new();
        log.record(name, at);
        log
    }

    /// Record `name` unless it is already present. Returns true when a new
    /// entry was appended.
    pub fn record(&mut self, name: &str, at: DateTime<Utc>) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push(HistoryEntry {
            name: name.to_string(),
            recorded_at: at,
        });
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// First-seen time of `name`.
    pub fn recorded_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.recorded_at)
    }

    /// All names, oldest first.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `name: <name> , time: <local time>` line per entry.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "name: {} , time: {}\n",
                    e.name,
                    e.recorded_at.with_timezone(&Local).format(TIME_FORMAT)
                )
            })
            .collect()
    }

    /// Rebuild a log from persisted entries, dropping repeated names.
    pub(crate) fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        let mut log = Self::new();
        for entry in entries {
            log.record(&entry.name, entry.recorded_at);
        }
        log
    }
}
