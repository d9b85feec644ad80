use crate::cli::{analyze_project, resolve_target, TargetArgs};
use crate::diagnostic::UnusedImportRecord;
use crate::errors::Result;
use crate::output::{CheckReport, OutputFormat};
use crate::walk::PathFilter;
use clap::Args;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Wake-up interval while nothing is pending.
const IDLE_POLL: Duration = Duration::from_secs(1);

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format for each re-analysis
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

/// What a filesystem event means for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    Touched(PathBuf),
    Removed(PathBuf),
}

fn changes(event: &Event, root: &Path, filter: &PathFilter) -> Vec<Change> {
    let removed = matches!(event.kind, EventKind::Remove(_));
    if !removed && !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return Vec::new();
    }
    event
        .paths
        .iter()
        .filter(|path| filter.matches(root, path))
        .map(|path| {
            if removed || !path.exists() {
                Change::Removed(path.clone())
            } else {
                Change::Touched(path.clone())
            }
        })
        .collect()
}

pub fn run(args: &WatchArgs) -> Result<()> {
    let mut overrides = args.target.to_cli_overrides();
    overrides.format = args.format;
    let (target_path, _) = resolve_target(&args.target.path)?;

    let analysis = analyze_project(&args.target, overrides)?;
    let root = analysis.root;
    let config = analysis.config;
    let mut session = analysis.session;
    let filter = PathFilter::new(&config.langs, &config.include, &config.exclude)?;

    let mut stdout = std::io::stdout();
    print_records(&mut stdout, &root, config.format, &analysis.outcome.records)?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&target_path, RecursiveMode::Recursive)?;
    tracing::info!("watching {}", target_path.display());

    loop {
        let timeout = session
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);
        match rx.recv_timeout(timeout) {
            Ok(Ok(event)) => {
                for change in changes(&event, &target_path, &filter) {
                    match change {
                        Change::Touched(path) => {
                            session.schedule(&path, Instant::now());
                        }
                        Change::Removed(path) => session.forget(&path),
                    }
                }
            }
            Ok(Err(err)) => tracing::warn!("Watcher error: {err}"),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        for (file, outcome) in session.run_due(Instant::now()) {
            match outcome {
                Ok(records) => {
                    tracing::debug!(file = %file.display(), found = records.len(), "re-analyzed");
                    print_records(&mut stdout, &root, config.format, &records)?;
                }
                Err(e) => tracing::warn!("Skipping {}: {}", file.display(), e),
            }
        }
    }
    Ok(())
}

fn print_records<W: Write>(
    writer: &mut W,
    root: &Path,
    format: OutputFormat,
    records: &[UnusedImportRecord],
) -> Result<()> {
    let comparison = crate::baseline::Comparison {
        new_issues: records.iter().collect(),
        baseline_issues: Vec::new(),
        resolved: 0,
    };
    let report = CheckReport::new(root, &comparison);
    report.write(format, writer)?;
    writer.flush()?;
    Ok(())
}
