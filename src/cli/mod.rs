pub mod baseline;
pub mod check;
pub mod config;
pub mod fix;
pub mod watch;

use crate::config::resolve::{project_root, resolve_config, CliOverrides};
use crate::config::ResolvedConfig;
use crate::diagnostic::Marker;
use crate::errors::{ImportSweepError, Result};
use crate::parse::AdapterRegistry;
use crate::session::{BatchOutcome, CancelToken, Session};
use crate::walk::{discover_files, Language};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(
    name = "importsweep",
    version,
    about = "Find, baseline and safely remove unused imports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report unused imports; exits 1 when any are new
    Check(check::CheckArgs),
    /// Remove unused imports in place
    Fix(fix::FixArgs),
    /// Manage the accepted-debt baseline
    Baseline(baseline::BaselineArgs),
    /// Re-analyze files as they change
    Watch(watch::WatchArgs),
    /// Inspect resolved configuration
    Config(config::ConfigArgs),
}

/// Dispatch to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check(args) => check::run(&args),
        Commands::Fix(args) => fix::run(&args),
        Commands::Baseline(args) => baseline::run(&args),
        Commands::Watch(args) => watch::run(&args),
        Commands::Config(args) => config::run(&args),
    }
}

/// File selection flags shared by every analyzing command.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// File or directory to analyze (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Restrict to these languages (comma-separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_language)]
    pub lang: Vec<Language>,

    /// Only analyze paths matching these globs
    #[arg(long)]
    pub include: Vec<String>,

    /// Skip paths matching these globs
    #[arg(long)]
    pub exclude: Vec<String>,

    /// JSON array of diagnostics from an external engine, used instead of
    /// the built-in usage scan
    #[arg(long)]
    pub markers: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long)]
    pub quiet: bool,
}

impl TargetArgs {
    pub fn to_cli_overrides(&self) -> CliOverrides {
        CliOverrides {
            langs: self.lang.clone(),
            quiet: self.quiet,
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            ..Default::default()
        }
    }
}

fn parse_language(s: &str) -> std::result::Result<Language, String> {
    s.parse()
}

/// Canonical target path and the project root it belongs to. The root is
/// looked up from the target's directory so the same file keys the same
/// way whichever path was passed.
pub fn resolve_target(path: &Option<PathBuf>) -> Result<(PathBuf, PathBuf)> {
    let path = path.clone().unwrap_or_else(|| PathBuf::from("."));
    let target = path
        .canonicalize()
        .map_err(|_| ImportSweepError::NoFiles { path: path.clone() })?;
    let dir = if target.is_file() {
        target.parent().unwrap_or(target.as_path())
    } else {
        target.as_path()
    };
    let root = project_root(dir);
    Ok((target, root))
}

/// Read an external marker file. Relative marker paths are taken from `root`.
pub fn load_markers(path: &Path, root: &Path) -> Result<Vec<Marker>> {
    let content = std::fs::read_to_string(path).map_err(|e| ImportSweepError::io(path, e))?;
    let mut markers: Vec<Marker> = serde_json::from_str(&content)?;
    for marker in &mut markers {
        if marker.file.is_relative() {
            marker.file = root.join(&marker.file);
        }
    }
    Ok(markers)
}

pub fn build_session(config: &ResolvedConfig, markers: Vec<Marker>) -> Session {
    Session::new(AdapterRegistry::with_builtin(), config.confidence)
        .with_timing(config.session.debounce(), config.session.cache_ttl())
        .with_markers(markers)
}

/// One finished analysis of a project.
pub struct Analysis {
    pub root: PathBuf,
    pub config: ResolvedConfig,
    pub session: Session,
    pub outcome: BatchOutcome,
    pub elapsed_ms: u64,
}

/// Resolve config, discover files and run the batch analysis.
pub fn analyze_project(target: &TargetArgs, overrides: CliOverrides) -> Result<Analysis> {
    let start = Instant::now();
    let (target_path, root) = resolve_target(&target.path)?;
    let config = resolve_config(&root, &overrides)?;

    let files = discover_files(&target_path, &config.langs, &config.include, &config.exclude)?;
    if files.is_empty() {
        return Err(ImportSweepError::NoFiles { path: target_path });
    }
    tracing::debug!(files = files.len(), root = %root.display(), "analyzing");

    let markers = match &target.markers {
        Some(path) => load_markers(path, &root)?,
        None => Vec::new(),
    };
    let session = build_session(&config, markers);

    let progress = if !config.quiet {
        let pb = indicatif::ProgressBar::new(files.len() as u64);
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let outcome = session.analyze_batch(&files, &CancelToken::new(), progress.as_ref());

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(Analysis {
        root,
        config,
        session,
        outcome,
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}
