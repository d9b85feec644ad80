use crate::baseline::{BaselineStore, Comparison};
use crate::cli::{analyze_project, TargetArgs};
use crate::errors::Result;
use crate::output::{CheckReport, OutputFormat};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Baseline file (defaults to .importsweep-baseline.json at the root)
    #[arg(long)]
    pub baseline_path: Option<PathBuf>,

    /// Only fail on findings missing from the baseline
    #[arg(long)]
    pub against_baseline: bool,
}

pub fn run(args: &CheckArgs) -> Result<()> {
    let mut overrides = args.target.to_cli_overrides();
    overrides.format = args.format;
    overrides.baseline_path = args.baseline_path.clone();

    let analysis = analyze_project(&args.target, overrides)?;
    let records = &analysis.outcome.records;

    let comparison = if args.against_baseline {
        let store = BaselineStore::new(
            analysis.config.baseline_path_for(&analysis.root),
            &analysis.root,
        );
        match store.load()? {
            Some(baseline) => store.compare(records, &baseline),
            None => {
                tracing::warn!(
                    "no baseline at {}; every finding counts as new",
                    store.path().display()
                );
                all_new(records)
            }
        }
    } else {
        all_new(records)
    };

    let mut report = CheckReport::new(&analysis.root, &comparison);
    report.summary.files_scanned = analysis.outcome.report.completed;
    report.summary.files_failed = analysis.outcome.failures.len();
    report.summary.elapsed_ms = analysis.elapsed_ms;

    let mut stdout = std::io::stdout();
    report.write(analysis.config.format, &mut stdout)?;
    stdout.flush()?;

    if comparison.has_new_issues() {
        std::process::exit(1);
    }
    Ok(())
}

fn all_new(records: &[crate::diagnostic::UnusedImportRecord]) -> Comparison<'_> {
    Comparison {
        new_issues: records.iter().collect(),
        baseline_issues: Vec::new(),
        resolved: 0,
    }
}
