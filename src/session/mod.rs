//! Analysis session: owns the adapter registry, the per-file debouncer and
//! the TTL result cache. Hosts construct one explicitly and keep it for as
//! long as they analyze files.

pub mod cache;
pub mod cancel;
pub mod debounce;

pub use cache::AnalysisCache;
pub use cancel::CancelToken;
pub use debounce::{Debouncer, Ticket};

use crate::confidence::ConfidenceWeights;
use crate::correlate::Correlator;
use crate::diagnostic::{Marker, UnusedImportRecord};
use crate::errors::{ImportSweepError, Result};
use crate::parse::AdapterRegistry;
use crate::scan;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// How far a batch got before it finished or was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub completed: usize,
    pub total: usize,
    pub cancelled: bool,
}

/// Everything a batch produced. Records are grouped per file in path order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub records: Vec<UnusedImportRecord>,
    pub failures: Vec<(PathBuf, ImportSweepError)>,
    pub report: BatchReport,
}

pub struct Session {
    registry: AdapterRegistry,
    weights: ConfidenceWeights,
    debouncer: Debouncer,
    cache: AnalysisCache<Vec<UnusedImportRecord>>,
    markers: HashMap<PathBuf, Vec<Marker>>,
}

impl Session {
    pub fn new(registry: AdapterRegistry, weights: ConfidenceWeights) -> Self {
        Self {
            registry,
            weights,
            debouncer: Debouncer::default(),
            cache: AnalysisCache::default(),
            markers: HashMap::new(),
        }
    }

    pub fn with_timing(mut self, debounce: Duration, cache_ttl: Duration) -> Self {
        self.debouncer = Debouncer::new(debounce);
        self.cache = AnalysisCache::new(cache_ttl);
        self
    }

    /// Use host-supplied markers instead of the usage scanner. Markers are
    /// grouped by their file; files without markers report nothing.
    pub fn with_markers(mut self, markers: Vec<Marker>) -> Self {
        for marker in markers {
            self.markers
                .entry(marker.file.clone())
                .or_default()
                .push(marker);
        }
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn weights(&self) -> &ConfidenceWeights {
        &self.weights
    }

    fn uses_host_markers(&self) -> bool {
        !self.markers.is_empty()
    }

    /// Analyze in-memory text. With `markers == None` the usage scanner
    /// produces them.
    pub fn analyze_text(
        &self,
        file: &Path,
        text: &str,
        markers: Option<&[Marker]>,
    ) -> Vec<UnusedImportRecord> {
        let correlator = Correlator::new(&self.registry, self.weights);
        match markers {
            Some(markers) => correlator.correlate_file(markers, text),
            None => {
                let grammar = self.registry.for_path(file);
                let scanned = scan::scan(grammar.as_ref(), file, text);
                correlator.correlate_file(&scanned, text)
            }
        }
    }

    /// Read and analyze one file from disk.
    pub fn analyze_file(&self, file: &Path) -> Result<Vec<UnusedImportRecord>> {
        let text = std::fs::read_to_string(file).map_err(|e| ImportSweepError::io(file, e))?;
        if self.uses_host_markers() {
            let markers = self.markers.get(file).map(Vec::as_slice).unwrap_or(&[]);
            return Ok(self.analyze_text(file, &text, Some(markers)));
        }
        Ok(self.analyze_text(file, &text, None))
    }

    /// Like `analyze_file`, served from the cache while the entry is fresh.
    pub fn analyze_cached(&mut self, file: &Path, now: Instant) -> Result<Vec<UnusedImportRecord>> {
        if let Some(hit) = self.cache.get(file, now) {
            tracing::debug!(file = %file.display(), "cache hit");
            return Ok(hit.clone());
        }
        let records = self.analyze_file(file)?;
        self.cache.insert(file, records.clone(), now);
        Ok(records)
    }

    /// A file changed: drop its cached result and (re)schedule a pass.
    pub fn schedule(&mut self, file: &Path, now: Instant) -> Ticket {
        self.cache.invalidate(file);
        self.debouncer.schedule(file, now)
    }

    /// A file went away: drop its pending pass and cached result.
    pub fn forget(&mut self, file: &Path) {
        self.debouncer.cancel(file);
        self.cache.invalidate(file);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// Run every pass whose debounce window has elapsed. Stale tickets are
    /// dropped without touching the file.
    pub fn run_due(&mut self, now: Instant) -> Vec<(PathBuf, Result<Vec<UnusedImportRecord>>)> {
        self.cache.prune_expired(now);
        let due = self.debouncer.take_due(now);
        let mut results = Vec::with_capacity(due.len());
        for ticket in due {
            if !self.debouncer.is_current(&ticket) {
                continue;
            }
            let outcome = self.analyze_cached(&ticket.file, now);
            results.push((ticket.file, outcome));
        }
        results
    }

    /// Analyze many files in parallel. The token is checked before each file
    /// starts; work already finished is kept when it fires.
    pub fn analyze_batch(
        &self,
        files: &[PathBuf],
        cancel: &CancelToken,
        progress: Option<&indicatif::ProgressBar>,
    ) -> BatchOutcome {
        let completed = AtomicUsize::new(0);

        let results: Vec<(PathBuf, Result<Vec<UnusedImportRecord>>)> = files
            .par_iter()
            .filter_map(|file| {
                if cancel.is_cancelled() {
                    return None;
                }
                let outcome = self.analyze_file(file);
                completed.fetch_add(1, Ordering::Relaxed);
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                Some((file.clone(), outcome))
            })
            .collect();

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for (file, outcome) in results {
            match outcome {
                Ok(found) => records.extend(found),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", file.display(), e);
                    failures.push((file, e));
                }
            }
        }

        let completed = completed.load(Ordering::Relaxed);
        BatchOutcome {
            records,
            failures,
            report: BatchReport {
                completed,
                total: files.len(),
                cancelled: cancel.is_cancelled() && completed < files.len(),
            },
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AdapterRegistry::with_builtin(), ConfidenceWeights::default())
    }
}
