//! Walk results and statistics.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use filesift_core::WalkWarning;

/// Counters describing one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Directories listed successfully, root included.
    pub dirs_listed: u64,
    /// Subdirectories skipped by the directory predicate.
    pub dirs_skipped: u64,
    /// File entries offered to the file predicate.
    pub files_seen: u64,
    /// Paths handed to the result collection.
    pub files_emitted: u64,
    /// Directories that could not be listed.
    pub listing_failures: u64,
    /// Entries skipped because a predicate panicked on them.
    pub predicate_panics: u64,
    /// Units that ended by unwinding outside a predicate call.
    pub units_aborted: u64,
    /// Highest number of listings in flight at once.
    pub peak_listings: u64,
}

/// Everything a walk produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkOutput {
    /// Normalized root that all paths start with.
    pub root: String,
    /// Matching file paths, in no particular order.
    pub files: Vec<String>,
    /// Walk counters.
    pub stats: WalkStats,
    /// Directories that could not be listed and entries a predicate failed on.
    pub warnings: Vec<WalkWarning>,
    /// Wall-clock duration of the walk.
    pub duration: Duration,
    /// Whether the walk was cut short by cancellation.
    pub cancelled: bool,
}

impl WalkOutput {
    /// Consume the output, keeping only the paths.
    pub fn into_files(self) -> Vec<String> {
        self.files
    }

    /// Paths as an ordered set, for order-independent comparison.
    pub fn file_set(&self) -> BTreeSet<&str> {
        self.files.iter().map(String::as_str).collect()
    }

    /// Sort the paths in place.
    pub fn sort(&mut self) {
        self.files.sort_unstable();
    }
}

/// Relaxed counters shared by concurrent units. Reporting only; nothing
/// synchronizes on them.
#[derive(Debug, Default)]
pub(crate) struct WalkCounters {
    pub dirs_listed: AtomicU64,
    pub dirs_skipped: AtomicU64,
    pub files_seen: AtomicU64,
    pub files_emitted: AtomicU64,
    pub listing_failures: AtomicU64,
    pub predicate_panics: AtomicU64,
}

impl WalkCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> WalkStats {
        WalkStats {
            dirs_listed: self.dirs_listed.load(Ordering::Relaxed),
            dirs_skipped: self.dirs_skipped.load(Ordering::Relaxed),
            files_seen: self.files_seen.load(Ordering::Relaxed),
            files_emitted: self.files_emitted.load(Ordering::Relaxed),
            listing_failures: self.listing_failures.load(Ordering::Relaxed),
            predicate_panics: self.predicate_panics.load(Ordering::Relaxed),
            units_aborted: 0,
            peak_listings: 0,
        }
    }
}
