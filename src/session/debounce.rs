use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Handle for one scheduled analysis pass. A ticket goes stale as soon as
/// the same file is scheduled again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub file: PathBuf,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: Instant,
    generation: u64,
}

/// Per-file debounce: each change pushes the file's deadline out by the
/// window, and only the last-scheduled pass per file ever runs.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    next_generation: u64,
    pending: HashMap<PathBuf, Pending>,
    latest: HashMap<PathBuf, u64>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            next_generation: 1,
            pending: HashMap::new(),
            latest: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule (or reschedule) `file`. Any earlier ticket for it is
    /// invalidated.
    pub fn schedule(&mut self, file: &Path, now: Instant) -> Ticket {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.pending.insert(
            file.to_path_buf(),
            Pending {
                deadline: now + self.window,
                generation,
            },
        );
        self.latest.insert(file.to_path_buf(), generation);
        Ticket {
            file: file.to_path_buf(),
            generation,
        }
    }

    /// Whether `ticket` is still the newest pass for its file.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.get(&ticket.file) == Some(&ticket.generation)
    }

    /// Drop a file's pending pass and invalidate its tickets.
    pub fn cancel(&mut self, file: &Path) {
        self.pending.remove(file);
        self.latest.remove(file);
    }

    /// Remove and return the passes whose deadline has passed, in path order.
    pub fn take_due(&mut self, now: Instant) -> Vec<Ticket> {
        let mut due: Vec<Ticket> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(file, p)| Ticket {
                file: file.clone(),
                generation: p.generation,
            })
            .collect();
        for ticket in &due {
            self.pending.remove(&ticket.file);
        }
        due.sort_by(|a, b| a.file.cmp(&b.file));
        due
    }

    /// Earliest pending deadline, for sleeping until work is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
