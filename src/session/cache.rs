use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Per-file analysis results that expire after a fixed TTL.
#[derive(Debug)]
pub struct AnalysisCache<V> {
    ttl: Duration,
    entries: HashMap<PathBuf, CacheEntry<V>>,
}

impl<V> AnalysisCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, file: &Path, now: Instant) -> Option<&V> {
        if self
            .entries
            .get(file)
            .is_some_and(|entry| entry.expires_at <= now)
        {
            self.entries.remove(file);
            return None;
        }
        self.entries.get(file).map(|entry| &entry.value)
    }

    pub fn insert(&mut self, file: &Path, value: V, now: Instant) {
        self.entries.insert(
            file.to_path_buf(),
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    pub fn invalidate(&mut self, file: &Path) {
        self.entries.remove(file);
    }

    pub fn prune_expired(&mut self, now: Instant) {
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for AnalysisCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
