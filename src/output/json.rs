use crate::baseline::{BaselineFile, Trend};
use crate::errors::Result;
use crate::output::{CheckReport, CheckSummary, Finding};
use crate::parse::ImportKind;
use crate::plan::RemovalPlan;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput<'a> {
    summary: &'a CheckSummary,
    findings: Vec<JsonFinding<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonFinding<'a> {
    file: &'a str,
    line: usize,
    start_line: usize,
    end_line: usize,
    statement: &'a str,
    source: &'a str,
    kind: ImportKind,
    /// Empty when the whole statement is unused.
    unused_symbols: &'a [String],
    confidence: f64,
    has_side_effects: bool,
    explanation: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    status: &'static str,
}

impl<'a> From<&'a Finding<'a>> for JsonFinding<'a> {
    fn from(finding: &'a Finding<'a>) -> Self {
        let record = finding.record;
        let import = record.import_record();
        let marker = record.source_marker();
        Self {
            file: &finding.path,
            line: marker.line,
            start_line: import.span().start,
            end_line: import.span().end,
            statement: import.raw_text(),
            source: import.source(),
            kind: import.kind(),
            unused_symbols: record.unused_symbols(),
            confidence: (record.confidence() * 100.0).round() / 100.0,
            has_side_effects: record.has_side_effects(),
            explanation: record.explanation(),
            origin: marker.origin.as_deref(),
            code: marker.code.as_deref(),
            status: if finding.is_new { "new" } else { "baseline" },
        }
    }
}

/// Write check output as pretty JSON.
pub fn write_check_json<W: Write>(writer: &mut W, report: &CheckReport) -> Result<()> {
    let output = CheckOutput {
        summary: &report.summary,
        findings: report.findings.iter().map(JsonFinding::from).collect(),
    };
    serde_json::to_writer_pretty(&mut *writer, &output)?;
    writeln!(writer)?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FixOutput<'a> {
    dry_run: bool,
    #[serde(flatten)]
    plan: &'a RemovalPlan,
}

/// Write a removal plan, with edit paths as given.
pub fn write_fix_json<W: Write>(writer: &mut W, plan: &RemovalPlan, dry_run: bool) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &FixOutput { dry_run, plan })?;
    writeln!(writer)?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BaselineOutput<'a> {
    path: &'a Path,
    version: &'a str,
    created_at: String,
    updated_at: String,
    trend: &'a Trend,
}

pub fn write_baseline_json<W: Write>(
    writer: &mut W,
    path: &Path,
    file: &BaselineFile,
    trend: &Trend,
) -> Result<()> {
    let output = BaselineOutput {
        path,
        version: &file.version,
        created_at: file.created_at.to_rfc3339(),
        updated_at: file.updated_at.to_rfc3339(),
        trend,
    };
    serde_json::to_writer_pretty(&mut *writer, &output)?;
    writeln!(writer)?;
    Ok(())
}
