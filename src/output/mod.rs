pub mod github;
pub mod json;
pub mod sarif;
pub mod text;

use crate::baseline::{normalize_path, Comparison};
use crate::diagnostic::UnusedImportRecord;
use crate::errors::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy, ValueEnum, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Sarif,
    Github,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
            OutputFormat::Github => write!(f, "github"),
        }
    }
}

/// One reported unused import, with its root-relative path.
#[derive(Debug, Clone)]
pub struct Finding<'a> {
    pub path: String,
    pub record: &'a UnusedImportRecord,
    /// Not covered by the baseline (always true without one).
    pub is_new: bool,
}

impl Finding<'_> {
    pub fn line(&self) -> usize {
        self.record.source_marker().line
    }

    /// One-line summary naming what is unused.
    pub fn message(&self) -> String {
        let import = self.record.import_record();
        if self.record.is_whole_statement() {
            format!("unused import `{}`", import.raw_text().trim())
        } else {
            format!(
                "unused {} from `{}`",
                self.record.unused_symbols().join(", "),
                import.source()
            )
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    pub files_scanned: usize,
    pub files_failed: usize,
    pub total: usize,
    pub new_issues: usize,
    pub baseline_issues: usize,
    pub resolved: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone)]
pub struct CheckReport<'a> {
    pub findings: Vec<Finding<'a>>,
    pub summary: CheckSummary,
}

impl<'a> CheckReport<'a> {
    /// Findings ordered by path then line. Scan counters are left for the
    /// caller to fill in.
    pub fn new(root: &Path, comparison: &Comparison<'a>) -> Self {
        let mut findings: Vec<Finding<'a>> = comparison
            .new_issues
            .iter()
            .map(|r| (r, true))
            .chain(comparison.baseline_issues.iter().map(|r| (r, false)))
            .map(|(record, is_new)| Finding {
                path: normalize_path(record.file(), root),
                record,
                is_new,
            })
            .collect();
        findings.sort_by(|a, b| (&a.path, a.line()).cmp(&(&b.path, b.line())));
        Self {
            findings,
            summary: CheckSummary {
                total: comparison.total(),
                new_issues: comparison.new_issues.len(),
                baseline_issues: comparison.baseline_issues.len(),
                resolved: comparison.resolved,
                ..Default::default()
            },
        }
    }

    pub fn write<W: Write>(&self, format: OutputFormat, writer: &mut W) -> Result<()> {
        match format {
            OutputFormat::Text => text::write_check_text(writer, self),
            OutputFormat::Json => json::write_check_json(writer, self),
            OutputFormat::Sarif => sarif::write_sarif(writer, self),
            OutputFormat::Github => github::write_annotations(writer, self),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::diagnostic::{Marker, UnusedImportRecord};
    use crate::parse::{ImportKind, ImportRecord, LineSpan};
    use std::path::Path;

    pub fn whole(root: &Path, file: &str, line: usize, statement: &str) -> UnusedImportRecord {
        let import = ImportRecord::new(
            ImportKind::Namespace,
            vec!["os".into()],
            "os",
            statement,
            LineSpan::single(line),
        );
        let marker = Marker::unused(root.join(file), line, "'os' is imported but never used")
            .with_origin("importsweep");
        UnusedImportRecord::new(import, marker, vec![], false, 0.9, "Never referenced.")
    }

    pub fn partial(root: &Path, file: &str, line: usize) -> UnusedImportRecord {
        let import = ImportRecord::new(
            ImportKind::Named,
            vec!["a".into(), "b".into()],
            "./x",
            "import { a, b } from './x';",
            LineSpan::single(line),
        );
        let marker = Marker::unused(root.join(file), line, "'b' is declared but never read.")
            .with_origin("ts")
            .with_code("6133");
        UnusedImportRecord::new(
            import,
            marker,
            vec!["b".into()],
            false,
            0.99,
            "'b' is never referenced.",
        )
    }
}
