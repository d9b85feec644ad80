use crate::baseline::{trend, BaselineStore};
use crate::cli::{analyze_project, resolve_target, TargetArgs};
use crate::config::resolve::{resolve_config, CliOverrides};
use crate::errors::Result;
use crate::output::OutputFormat;
use clap::{Args, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BaselineArgs {
    #[command(subcommand)]
    pub action: BaselineAction,
}

#[derive(Debug, Subcommand)]
pub enum BaselineAction {
    /// Write a fresh baseline from the current findings, dropping any history
    Generate(BaselineWriteArgs),
    /// Replace the accepted entries, recording the previous level in history
    Update(BaselineWriteArgs),
    /// Show the current debt level and its trend
    Show(BaselineShowArgs),
}

#[derive(Debug, Args)]
pub struct BaselineWriteArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Baseline file (defaults to .importsweep-baseline.json at the root)
    #[arg(long)]
    pub baseline_path: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BaselineShowArgs {
    /// Project directory (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Baseline file (defaults to .importsweep-baseline.json at the root)
    #[arg(long)]
    pub baseline_path: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

pub fn run(args: &BaselineArgs) -> Result<()> {
    match &args.action {
        BaselineAction::Generate(write) => run_write(write, false),
        BaselineAction::Update(write) => run_write(write, true),
        BaselineAction::Show(show) => run_show(show),
    }
}

fn run_write(args: &BaselineWriteArgs, update: bool) -> Result<()> {
    let mut overrides = args.target.to_cli_overrides();
    overrides.baseline_path = args.baseline_path.clone();
    let analysis = analyze_project(&args.target, overrides)?;

    let store = BaselineStore::new(
        analysis.config.baseline_path_for(&analysis.root),
        &analysis.root,
    );
    let records = &analysis.outcome.records;
    let file = if update {
        store.update(records)?
    } else {
        let file = store.generate(records);
        store.save(&file)?;
        file
    };

    let mut stdout = std::io::stdout();
    writeln!(
        stdout,
        "{} {} with {} unused imports in {} files",
        if update { "Updated" } else { "Wrote" },
        store.path().display(),
        file.metadata.total_unused_imports,
        file.metadata.total_files
    )?;
    Ok(())
}

fn run_show(args: &BaselineShowArgs) -> Result<()> {
    let (_, root) = resolve_target(&args.path)?;
    let overrides = CliOverrides {
        format: args.format,
        baseline_path: args.baseline_path.clone(),
        ..Default::default()
    };
    let config = resolve_config(&root, &overrides)?;
    let store = BaselineStore::new(config.baseline_path_for(&root), &root);

    let mut stdout = std::io::stdout();
    let Some(file) = store.load()? else {
        writeln!(
            stdout,
            "No baseline at {}; run `importsweep baseline generate`",
            store.path().display()
        )?;
        return Ok(());
    };
    let summary = trend(&file);
    match config.format {
        OutputFormat::Json => {
            crate::output::json::write_baseline_json(&mut stdout, store.path(), &file, &summary)?
        }
        _ => crate::output::text::write_trend_text(&mut stdout, store.path(), &summary)?,
    }
    Ok(())
}
