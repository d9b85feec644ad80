use crate::cli::{analyze_project, TargetArgs};
use crate::edit::apply_edits;
use crate::errors::{ImportSweepError, Result};
use crate::output::OutputFormat;
use crate::plan::{plan_removals, Edit, RemovalPlan};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct FixArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Also remove imports that may have side effects
    #[arg(long)]
    pub aggressive: bool,

    /// Print the planned edits without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Leave findings below this confidence untouched
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Output format (text or json)
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

pub fn run(args: &FixArgs) -> Result<()> {
    let mut overrides = args.target.to_cli_overrides();
    overrides.format = args.format;
    overrides.aggressive = args.aggressive;
    overrides.min_confidence = args.min_confidence;

    let analysis = analyze_project(&args.target, overrides)?;
    let plan = plan_removals(
        &analysis.outcome.records,
        analysis.session.registry(),
        analysis.config.fix,
    );
    tracing::debug!(edits = plan.edits.len(), "removal plan ready");

    if !args.dry_run {
        write_plan(&plan)?;
    }

    let mut stdout = std::io::stdout();
    match analysis.config.format {
        OutputFormat::Json => crate::output::json::write_fix_json(&mut stdout, &plan, args.dry_run)?,
        _ => crate::output::text::write_fix_text(&mut stdout, &analysis.root, &plan, args.dry_run)?,
    }
    stdout.flush()?;
    Ok(())
}

/// Apply every edit of `plan`. All files are rewritten in memory first, so a
/// stale file aborts the run before anything is written.
pub fn write_plan(plan: &RemovalPlan) -> Result<()> {
    let mut rewritten: Vec<(PathBuf, String)> = Vec::new();
    for file in plan.files() {
        let edits: Vec<Edit> = plan.edits_for(file).cloned().collect();
        let text = std::fs::read_to_string(file).map_err(|e| ImportSweepError::io(file, e))?;
        rewritten.push((file.clone(), apply_edits(file, &text, &edits)?));
    }
    for (file, text) in rewritten {
        write_file(&file, &text)?;
    }
    Ok(())
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|e| ImportSweepError::io(path, e))?;
    tracing::debug!(file = %path.display(), "rewrote");
    Ok(())
}
