use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Schema version written by this crate.
pub const CURRENT_VERSION: &str = "3.0.0";

/// Version tag carried by each history snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// History keeps at most this many snapshots, newest last.
pub const MAX_HISTORY: usize = 30;

/// Default file name, relative to the project root.
pub const DEFAULT_BASELINE_FILE: &str = ".importsweep-baseline.json";

/// One accepted unused import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineEntry {
    /// Forward-slash path relative to the project root.
    pub file_path: String,
    pub line: usize,
    pub import_statement: String,
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// Identity of an entry: normalized path, line, trimmed statement text.
pub type EntryKey = (String, usize, String);

/// Forward slashes, no leading `./`.
pub fn normalize_separators(path: &str) -> String {
    let text = path.replace('\\', "/");
    let mut rest = text.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest.to_string()
}

impl BaselineEntry {
    pub fn key(&self) -> EntryKey {
        (
            normalize_separators(&self.file_path),
            self.line,
            self.import_statement.trim().to_string(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineMetadata {
    pub total_files: usize,
    pub total_unused_imports: usize,
}

impl BaselineMetadata {
    pub fn from_entries(entries: &[BaselineEntry]) -> Self {
        let files: BTreeSet<&str> = entries.iter().map(|e| e.file_path.as_str()).collect();
        Self {
            total_files: files.len(),
            total_unused_imports: entries.len(),
        }
    }
}

/// Debt level at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSnapshot {
    pub timestamp: DateTime<Utc>,
    pub metadata: BaselineMetadata,
    pub version: String,
}

/// The persisted ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineFile {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub entries: Vec<BaselineEntry>,
    pub metadata: BaselineMetadata,
    #[serde(default)]
    pub history: Vec<HistoricalSnapshot>,
}

impl BaselineFile {
    /// Fresh ledger with no history.
    pub fn new(entries: Vec<BaselineEntry>, now: DateTime<Utc>) -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
            metadata: BaselineMetadata::from_entries(&entries),
            entries,
            history: Vec::new(),
        }
    }

    pub fn keys(&self) -> BTreeSet<EntryKey> {
        self.entries.iter().map(BaselineEntry::key).collect()
    }
}

/// Sort snapshots chronologically and keep the newest `MAX_HISTORY`.
pub fn prune_history(history: &mut Vec<HistoricalSnapshot>) {
    history.sort_by_key(|s| s.timestamp);
    if history.len() > MAX_HISTORY {
        history.drain(..history.len() - MAX_HISTORY);
    }
}
