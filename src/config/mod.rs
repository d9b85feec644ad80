pub mod provenance;
pub mod resolve;
pub mod schema;
pub mod show;

use crate::baseline::schema::DEFAULT_BASELINE_FILE;
use crate::confidence::ConfidenceWeights;
use crate::output::OutputFormat;
use crate::plan::PlanOptions;
use crate::session::cache::DEFAULT_CACHE_TTL;
use crate::session::debounce::DEFAULT_DEBOUNCE;
use crate::walk::Language;
use provenance::ProvenanceMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project configuration file, found by walking up from the working directory.
pub const PROJECT_CONFIG_FILE_NAME: &str = ".importsweep.toml";

/// Gitignore-style file honoured during discovery.
pub const IGNORE_FILE_NAME: &str = ".importsweepignore";

/// Fully resolved configuration. No Option fields.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    // Operational
    pub langs: Vec<Language>,
    pub format: OutputFormat,
    pub quiet: bool,

    // Targeting
    pub include: Vec<String>,
    pub exclude: Vec<String>,

    pub baseline_path: PathBuf,
    pub fix: PlanOptions,
    pub confidence: ConfidenceWeights,
    pub session: ResolvedSessionConfig,

    // Provenance
    pub provenance: ProvenanceMap,
    pub loaded_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSessionConfig {
    pub debounce_ms: u64,
    pub cache_ttl_ms: u64,
}

impl Default for ResolvedSessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            cache_ttl_ms: DEFAULT_CACHE_TTL.as_millis() as u64,
        }
    }
}

impl ResolvedSessionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            langs: Vec::new(),
            format: OutputFormat::default(),
            quiet: false,
            include: Vec::new(),
            exclude: Vec::new(),
            baseline_path: PathBuf::from(DEFAULT_BASELINE_FILE),
            fix: PlanOptions::default(),
            confidence: ConfidenceWeights::default(),
            session: ResolvedSessionConfig::default(),
            provenance: ProvenanceMap::new(),
            loaded_files: Vec::new(),
        }
    }
}

impl ResolvedConfig {
    /// Baseline location for a project rooted at `root`. Relative paths are
    /// taken from the root.
    pub fn baseline_path_for(&self, root: &Path) -> PathBuf {
        if self.baseline_path.is_absolute() {
            self.baseline_path.clone()
        } else {
            root.join(&self.baseline_path)
        }
    }
}
