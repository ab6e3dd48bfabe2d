//! Outstanding-unit counting and completion signalling.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;
use tracing::error;

/// Counts live walk units and signals once when the count returns to zero.
///
/// A child is always registered by its parent before the parent completes,
/// so the count can only reach zero after the last unit of the whole walk.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    outstanding: AtomicUsize,
    aborted: AtomicUsize,
    done: Notify,
}

impl CompletionTracker {
    /// Create an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly dispatched unit.
    pub fn register(&self) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
    }

    /// Record a finished unit. Returns `true` for the call that brought the
    /// count to zero, which is also the call that wakes the waiter.
    pub fn complete(&self) -> bool {
        let previous = self.outstanding.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "completed more units than were registered");
        if previous == 1 {
            self.done.notify_one();
            true
        } else {
            false
        }
    }

    /// Wait until every registered unit has completed.
    ///
    /// The wake-up is stored if the last unit finishes before anyone waits.
    pub async fn wait(&self) {
        self.done.notified().await;
    }

    /// Units currently alive.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Units that finished by unwinding.
    pub fn aborted(&self) -> usize {
        self.aborted.load(Ordering::Acquire)
    }
}

/// Registers a unit on creation and completes it on drop.
///
/// Completion happens on every exit path, including a panic that escapes
/// the unit and a task dropped by a shutting-down runtime.
#[derive(Debug)]
pub struct UnitGuard {
    tracker: Arc<CompletionTracker>,
    dir: String,
}

impl UnitGuard {
    /// Register a unit for `dir`.
    pub fn register(tracker: &Arc<CompletionTracker>, dir: impl Into<String>) -> Self {
        tracker.register();
        Self {
            tracker: Arc::clone(tracker),
            dir: dir.into(),
        }
    }
}

impl Drop for UnitGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.tracker.aborted.fetch_add(1, Ordering::AcqRel);
            error!(dir = %self.dir, "Walk unit aborted, subtree skipped");
        }
        self.tracker.complete();
    }
}
