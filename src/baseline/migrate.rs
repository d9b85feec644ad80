//! Upgrades baseline files written by older releases to the current schema.
//!
//! `version` and `entries` are load-bearing, as are `createdAt`, `updatedAt`
//! and `metadata` on current files: a missing or malformed value is a
//! `BaselineFormat` error. Legacy files fill in missing timestamps. Metadata
//! is always recomputed from the entries. `history` is ancillary: legacy
//! files start with an empty one and a malformed one is dropped with a
//! warning.

use crate::baseline::schema::{
    normalize_separators, prune_history, BaselineEntry, BaselineFile, BaselineMetadata, HistoricalSnapshot,
    CURRENT_VERSION,
};
use crate::errors::{ImportSweepError, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::path::Path;

/// Leading numeric component of a semver-like version string.
fn major(version: &str) -> Option<u64> {
    version.split('.').next()?.parse().ok()
}

fn timestamp(
    obj: &Map<String, Value>,
    field: &str,
    path: &Path,
) -> Result<Option<DateTime<Utc>>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ImportSweepError::baseline_format(path, format!("malformed `{field}`: {e}"))),
    }
}

/// Bring a parsed baseline document to `CURRENT_VERSION`. Idempotent: a
/// current file passes through with its history sorted and bounded.
pub fn migrate(raw: Value, path: &Path) -> Result<BaselineFile> {
    let Value::Object(obj) = raw else {
        return Err(ImportSweepError::baseline_format(path, "expected a JSON object"));
    };

    let version = obj
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| ImportSweepError::baseline_format(path, "missing or non-string `version`"))?;
    let current_major = major(CURRENT_VERSION).unwrap_or_default();
    match major(version) {
        None => {
            return Err(ImportSweepError::baseline_format(
                path,
                format!("malformed `version` {version:?}"),
            ))
        }
        Some(m) if m > current_major => {
            return Err(ImportSweepError::baseline_format(
                path,
                format!("version {version} is newer than supported {CURRENT_VERSION}"),
            ))
        }
        Some(_) => {}
    }
    let legacy = version != CURRENT_VERSION;

    let mut entries: Vec<BaselineEntry> = match obj.get("entries") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| ImportSweepError::baseline_format(path, format!("malformed `entries`: {e}")))?,
        None => return Err(ImportSweepError::baseline_format(path, "missing `entries`")),
    };
    for entry in &mut entries {
        entry.file_path = normalize_separators(&entry.file_path);
    }

    let created = timestamp(&obj, "createdAt", path)?;
    let updated = timestamp(&obj, "updatedAt", path)?;
    let (created_at, updated_at) = if legacy {
        let created_at = created.or(updated).unwrap_or_default();
        (created_at, updated.unwrap_or(created_at))
    } else {
        let created_at =
            created.ok_or_else(|| ImportSweepError::baseline_format(path, "missing `createdAt`"))?;
        let updated_at =
            updated.ok_or_else(|| ImportSweepError::baseline_format(path, "missing `updatedAt`"))?;
        match obj.get("metadata") {
            Some(value) => {
                serde_json::from_value::<BaselineMetadata>(value.clone()).map_err(|e| {
                    ImportSweepError::baseline_format(path, format!("malformed `metadata`: {e}"))
                })?;
            }
            None => return Err(ImportSweepError::baseline_format(path, "missing `metadata`")),
        }
        (created_at, updated_at)
    };

    let mut history: Vec<HistoricalSnapshot> = if legacy {
        tracing::debug!(path = %path.display(), from = version, "migrating legacy baseline");
        Vec::new()
    } else {
        match obj.get("history") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    "discarding malformed baseline history: {e}"
                );
                Vec::new()
            }),
        }
    };
    prune_history(&mut history);

    Ok(BaselineFile {
        version: CURRENT_VERSION.to_string(),
        created_at,
        updated_at,
        metadata: BaselineMetadata::from_entries(&entries),
        entries,
        history,
    })
}
