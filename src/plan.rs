use crate::diagnostic::UnusedImportRecord;
use crate::parse::AdapterRegistry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanOptions {
    /// Skip records whose removal could change behavior.
    pub safe_mode: bool,
    /// Records below this confidence are left alone.
    pub min_confidence: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            safe_mode: true,
            min_confidence: 0.0,
        }
    }
}

/// Replace or delete an inclusive, 1-indexed line range of one file.
/// `replacement: None` removes the lines including their terminators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edit {
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub replacement: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStatus {
    /// At least one edit was produced.
    Ready,
    NothingToRemove,
    /// Every candidate was withheld because it may have side effects.
    NothingSafelyRemovable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub attempted: usize,
    pub applied_count: usize,
    pub skipped_side_effect_count: usize,
    pub skipped_low_confidence_count: usize,
    /// Records dropped because their span overlapped one already planned.
    pub skipped_overlap_count: usize,
    pub status: PlanStatus,
}

/// Edits grouped by file in path order; within a file, bottom-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalPlan {
    pub edits: Vec<Edit>,
    pub summary: PlanSummary,
}

impl RemovalPlan {
    /// Edits for `file`, already ordered for sequential application.
    pub fn edits_for<'a>(&'a self, file: &'a std::path::Path) -> impl Iterator<Item = &'a Edit> {
        self.edits.iter().filter(move |e| e.file == file)
    }

    pub fn files(&self) -> Vec<&PathBuf> {
        let mut files: Vec<&PathBuf> = self.edits.iter().map(|e| &e.file).collect();
        files.dedup();
        files
    }
}

/// Turn unused-import records into a non-conflicting edit batch. Never
/// touches the filesystem.
pub fn plan_removals(
    records: &[UnusedImportRecord],
    registry: &AdapterRegistry,
    options: PlanOptions,
) -> RemovalPlan {
    let attempted = records.len();
    let mut skipped_side_effect_count = 0;
    let mut skipped_low_confidence_count = 0;
    let mut skipped_overlap_count = 0;

    let mut by_file: BTreeMap<&std::path::Path, Vec<&UnusedImportRecord>> = BTreeMap::new();
    for record in records {
        if options.safe_mode && record.has_side_effects() {
            skipped_side_effect_count += 1;
            continue;
        }
        if record.confidence() < options.min_confidence {
            skipped_low_confidence_count += 1;
            continue;
        }
        by_file.entry(record.file()).or_default().push(record);
    }

    let mut edits = Vec::new();
    for (file, mut file_records) in by_file {
        file_records.sort_by(|a, b| {
            let (a, b) = (a.import_record().span(), b.import_record().span());
            b.start.cmp(&a.start).then(b.end.cmp(&a.end))
        });
        let grammar = registry.for_path(file);
        let mut lowest_start = usize::MAX;
        for record in file_records {
            let span = record.import_record().span();
            if span.end >= lowest_start {
                tracing::debug!(
                    file = %file.display(),
                    line = span.start,
                    "skipping overlapping removal"
                );
                skipped_overlap_count += 1;
                continue;
            }
            lowest_start = span.start;
            // The adapter may keep specs it never reports, such as Go blank imports.
            let replacement =
                grammar.reconstruct_without(record.import_record(), record.reported_symbols());
            edits.push(Edit {
                file: file.to_path_buf(),
                start_line: span.start,
                end_line: span.end,
                replacement,
            });
        }
    }

    let status = if !edits.is_empty() {
        PlanStatus::Ready
    } else if options.safe_mode && skipped_side_effect_count > 0 {
        PlanStatus::NothingSafelyRemovable
    } else {
        PlanStatus::NothingToRemove
    };

    RemovalPlan {
        summary: PlanSummary {
            attempted,
            applied_count: edits.len(),
            skipped_side_effect_count,
            skipped_low_confidence_count,
            skipped_overlap_count,
            status,
        },
        edits,
    }
}
