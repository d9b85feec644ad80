use crate::baseline::Trend;
use crate::errors::Result;
use crate::output::CheckReport;
use crate::plan::{PlanStatus, RemovalPlan};
use std::io::Write;
use std::path::Path;

/// Write check output as human-readable text.
pub fn write_check_text<W: Write>(writer: &mut W, report: &CheckReport) -> Result<()> {
    let mut current: Option<&str> = None;
    for finding in &report.findings {
        if current != Some(finding.path.as_str()) {
            if current.is_some() {
                writeln!(writer)?;
            }
            writeln!(writer, "{}", finding.path)?;
            current = Some(&finding.path);
        }
        let tag = if finding.is_new { "" } else { " [baseline]" };
        writeln!(
            writer,
            "  {:>4}  {} ({:.0}% confidence){tag}",
            finding.line(),
            finding.message(),
            finding.record.confidence() * 100.0,
        )?;
        writeln!(writer, "        {}", finding.record.explanation())?;
    }
    if !report.findings.is_empty() {
        writeln!(writer)?;
    }

    let s = &report.summary;
    writeln!(
        writer,
        "Scanned {} files in {}ms ({} unreadable)",
        s.files_scanned, s.elapsed_ms, s.files_failed
    )?;
    writeln!(
        writer,
        "Unused imports: {} ({} new, {} in baseline, {} resolved)",
        s.total, s.new_issues, s.baseline_issues, s.resolved
    )?;
    Ok(())
}

/// Summarize a removal plan. Paths are shown relative to `root`.
pub fn write_fix_text<W: Write>(
    writer: &mut W,
    root: &Path,
    plan: &RemovalPlan,
    dry_run: bool,
) -> Result<()> {
    let verb = if dry_run { "Would edit" } else { "Edited" };
    for file in plan.files() {
        let display = file.strip_prefix(root).unwrap_or(file);
        writeln!(writer, "{verb} {}", display.display())?;
        for edit in plan.edits_for(file) {
            let range = if edit.start_line == edit.end_line {
                format!("line {}", edit.start_line)
            } else {
                format!("lines {}-{}", edit.start_line, edit.end_line)
            };
            match &edit.replacement {
                None => writeln!(writer, "  remove {range}")?,
                Some(text) => writeln!(writer, "  rewrite {range} -> {}", text.trim())?,
            }
        }
    }

    let s = &plan.summary;
    let status = match s.status {
        PlanStatus::Ready => "ready",
        PlanStatus::NothingToRemove => "nothing to remove",
        PlanStatus::NothingSafelyRemovable => {
            "nothing safely removable (rerun with --aggressive to include side-effect imports)"
        }
    };
    writeln!(
        writer,
        "{} of {} unused imports planned; skipped {} side-effect, {} low-confidence, {} overlapping: {status}",
        s.applied_count,
        s.attempted,
        s.skipped_side_effect_count,
        s.skipped_low_confidence_count,
        s.skipped_overlap_count,
    )?;
    Ok(())
}

pub fn write_trend_text<W: Write>(writer: &mut W, path: &Path, trend: &Trend) -> Result<()> {
    writeln!(writer, "Baseline:       {}", path.display())?;
    writeln!(
        writer,
        "Unused imports: {} across {} files",
        trend.current.total_unused_imports, trend.current.total_files
    )?;
    match (&trend.since, &trend.oldest) {
        (Some(since), Some(_)) => {
            writeln!(
                writer,
                "Since {}: {:+} imports, {:+} files ({} snapshots)",
                since.format("%Y-%m-%d %H:%M UTC"),
                trend.delta_unused_imports,
                trend.delta_files,
                trend.snapshots
            )?;
        }
        _ => writeln!(writer, "No history recorded yet")?,
    }
    Ok(())
}
