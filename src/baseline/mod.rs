pub mod migrate;
pub mod schema;

pub use schema::{
    BaselineEntry, BaselineFile, BaselineMetadata, EntryKey, HistoricalSnapshot, CURRENT_VERSION,
    DEFAULT_BASELINE_FILE, MAX_HISTORY, SNAPSHOT_VERSION,
};

use crate::diagnostic::UnusedImportRecord;
use crate::errors::{ImportSweepError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Forward-slash form of `file` relative to `root` (left as-is when outside).
pub fn normalize_path(file: &Path, root: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    schema::normalize_separators(&relative.to_string_lossy())
}

/// Ledger entries for `records`, deduplicated by key and sorted by path then
/// line.
pub fn entries_from_records(records: &[UnusedImportRecord], root: &Path) -> Vec<BaselineEntry> {
    let mut seen = BTreeSet::new();
    let mut entries: Vec<BaselineEntry> = records
        .iter()
        .map(|record| entry_for(record, root))
        .filter(|entry| seen.insert(entry.key()))
        .collect();
    entries.sort_by(|a, b| (&a.file_path, a.line).cmp(&(&b.file_path, b.line)));
    entries
}

fn entry_for(record: &UnusedImportRecord, root: &Path) -> BaselineEntry {
    let import = record.import_record();
    BaselineEntry {
        file_path: normalize_path(record.file(), root),
        line: import.span().start,
        import_statement: import.raw_text().trim().to_string(),
        symbols: record.reported_symbols().to_vec(),
    }
}

/// Findings split against a baseline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison<'a> {
    pub new_issues: Vec<&'a UnusedImportRecord>,
    pub baseline_issues: Vec<&'a UnusedImportRecord>,
    /// Baseline entries no longer reported.
    pub resolved: usize,
}

impl Comparison<'_> {
    pub fn total(&self) -> usize {
        self.new_issues.len() + self.baseline_issues.len()
    }

    pub fn has_new_issues(&self) -> bool {
        !self.new_issues.is_empty()
    }
}

/// Debt movement across the recorded history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub snapshots: usize,
    pub since: Option<DateTime<Utc>>,
    pub oldest: Option<BaselineMetadata>,
    pub current: BaselineMetadata,
    pub delta_unused_imports: i64,
    pub delta_files: i64,
}

/// Summarize `file.history` against the current metadata.
pub fn trend(file: &BaselineFile) -> Trend {
    let oldest = file.history.first();
    let base = oldest.map(|s| s.metadata).unwrap_or(file.metadata);
    Trend {
        snapshots: file.history.len(),
        since: oldest.map(|s| s.timestamp),
        oldest: oldest.map(|s| s.metadata),
        current: file.metadata,
        delta_unused_imports: file.metadata.total_unused_imports as i64
            - base.total_unused_imports as i64,
        delta_files: file.metadata.total_files as i64 - base.total_files as i64,
    }
}

/// Snapshot the pre-update state into history, then replace entries. Pure:
/// the caller persists the result in one write.
pub fn apply_update(
    mut file: BaselineFile,
    entries: Vec<BaselineEntry>,
    now: DateTime<Utc>,
) -> BaselineFile {
    file.history.push(HistoricalSnapshot {
        timestamp: file.updated_at,
        metadata: file.metadata,
        version: SNAPSHOT_VERSION.to_string(),
    });
    schema::prune_history(&mut file.history);
    file.metadata = BaselineMetadata::from_entries(&entries);
    file.entries = entries;
    file.updated_at = now.max(file.updated_at);
    file
}

/// The on-disk baseline for one project.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
    root: PathBuf,
}

impl BaselineStore {
    /// `path` is the baseline file; `root` anchors the relative entry paths.
    pub fn new(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: root.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read and migrate the baseline. `Ok(None)` when the file is absent;
    /// unreadable JSON or a schema violation is `BaselineFormat`.
    pub fn load(&self) -> Result<Option<BaselineFile>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ImportSweepError::io(&self.path, e)),
        };
        let raw: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            ImportSweepError::baseline_format(&self.path, format!("not valid JSON: {e}"))
        })?;
        migrate::migrate(raw, &self.path).map(Some)
    }

    /// Write atomically through a sibling temp file.
    pub fn save(&self, file: &BaselineFile) -> Result<()> {
        let mut json = serde_json::to_string_pretty(file)?;
        json.push('\n');
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_BASELINE_FILE.to_string());
        let tmp = self.path.with_file_name(format!(".{file_name}.tmp"));
        std::fs::write(&tmp, json).map_err(|e| ImportSweepError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| ImportSweepError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "baseline written");
        Ok(())
    }

    pub fn generate(&self, records: &[UnusedImportRecord]) -> BaselineFile {
        self.generate_at(records, Utc::now())
    }

    pub fn generate_at(&self, records: &[UnusedImportRecord], now: DateTime<Utc>) -> BaselineFile {
        BaselineFile::new(entries_from_records(records, &self.root), now)
    }

    /// Load, snapshot, replace and save. Generates a fresh file when none
    /// exists yet.
    pub fn update(&self, records: &[UnusedImportRecord]) -> Result<BaselineFile> {
        self.update_at(records, Utc::now())
    }

    pub fn update_at(
        &self,
        records: &[UnusedImportRecord],
        now: DateTime<Utc>,
    ) -> Result<BaselineFile> {
        let updated = match self.load()? {
            Some(existing) => {
                apply_update(existing, entries_from_records(records, &self.root), now)
            }
            None => self.generate_at(records, now),
        };
        self.save(&updated)?;
        Ok(updated)
    }

    /// Partition `records` into new and already-accepted findings. Read-only.
    pub fn compare<'a>(
        &self,
        records: &'a [UnusedImportRecord],
        baseline: &BaselineFile,
    ) -> Comparison<'a> {
        let accepted = baseline.keys();
        let mut current = BTreeSet::new();
        let mut new_issues = Vec::new();
        let mut baseline_issues = Vec::new();
        for record in records {
            let key = entry_for(record, &self.root).key();
            if accepted.contains(&key) {
                baseline_issues.push(record);
            } else {
                new_issues.push(record);
            }
            current.insert(key);
        }
        let resolved = accepted.difference(&current).count();
        Comparison {
            new_issues,
            baseline_issues,
            resolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Marker;
    use crate::parse::{ImportKind, ImportRecord, LineSpan};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn record(root: &Path, file: &str, line: usize, statement: &str) -> UnusedImportRecord {
        let import = ImportRecord::new(
            ImportKind::Namespace,
            vec!["x".into()],
            "x",
            statement,
            LineSpan::single(line),
        );
        let marker = Marker::unused(root.join(file), line, "'x' is never used");
        UnusedImportRecord::new(import, marker, vec![], false, 0.9, "Never referenced")
    }

    #[test]
    fn normalizes_relative_forward_slash_paths() {
        let root = Path::new("/repo");
        assert_eq!(normalize_path(Path::new("/repo/src/a.ts"), root), "src/a.ts");
        assert_eq!(normalize_path(Path::new("./lib/b.py"), Path::new("/x")), "lib/b.py");
    }

    #[test]
    fn generate_dedups_entries() {
        let root = Path::new("/repo");
        let store = BaselineStore::new("/repo/.importsweep-baseline.json", root);
        let records = vec![
            record(root, "a.py", 1, "import os"),
            record(root, "a.py", 1, "import os  "),
            record(root, "a.py", 2, "import sys"),
            record(root, "b.py", 3, "import re"),
        ];
        let file = store.generate(&records);
        assert_eq!(file.entries.len(), 3);
        assert_eq!(file.metadata.total_unused_imports, 3);
        assert_eq!(file.metadata.total_files, 2);
        assert!(file.history.is_empty());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = BaselineStore::new(dir.path().join("none.json"), dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = BaselineStore::new(&path, dir.path());
        assert!(matches!(
            store.load(),
            Err(ImportSweepError::BaselineFormat { .. })
        ));
        // never regenerated behind the caller's back
        assert!(store.update(&[]).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn update_snapshots_pre_update_state() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let store = BaselineStore::new(root.join("b.json"), root);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        store
            .update_at(&[record(root, "a.py", 1, "import os")], t0)
            .unwrap();
        let file = store
            .update_at(
                &[
                    record(root, "a.py", 1, "import os"),
                    record(root, "a.py", 2, "import sys"),
                ],
                t1,
            )
            .unwrap();

        assert_eq!(file.history.len(), 1);
        assert_eq!(file.history[0].timestamp, t0);
        assert_eq!(file.history[0].metadata.total_unused_imports, 1);
        assert_eq!(file.metadata.total_unused_imports, 2);
        assert_eq!(file.created_at, t0);
        assert_eq!(file.updated_at, t1);
        assert_eq!(store.load().unwrap(), Some(file));
    }

    #[test]
    fn compare_partitions_and_counts_resolved() {
        let root = Path::new("/repo");
        let store = BaselineStore::new("/repo/b.json", root);
        let baseline = store.generate(&[
            record(root, "file.x", 3, "import a"),
            record(root, "file.x", 9, "import gone"),
        ]);
        let current = vec![
            record(root, "file.x", 3, "import a"),
            record(root, "file.x", 5, "import b"),
        ];
        let comparison = store.compare(&current, &baseline);
        assert_eq!(comparison.new_issues.len(), 1);
        assert_eq!(comparison.baseline_issues.len(), 1);
        assert_eq!(comparison.resolved, 1);
        assert_eq!(comparison.total(), 2);
        assert_eq!(comparison.new_issues[0].import_record().raw_text(), "import b");
    }

    #[test]
    fn trend_compares_oldest_snapshot() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut file = BaselineFile::new(vec![], t0);
        file.history.push(HistoricalSnapshot {
            timestamp: t0,
            metadata: BaselineMetadata {
                total_files: 3,
                total_unused_imports: 7,
            },
            version: SNAPSHOT_VERSION.to_string(),
        });
        let t = trend(&file);
        assert_eq!(t.snapshots, 1);
        assert_eq!(t.delta_unused_imports, -7);
        assert_eq!(t.delta_files, -3);
        assert_eq!(t.since, Some(t0));
    }
}
