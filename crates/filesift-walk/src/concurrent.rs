//! Bounded-concurrency walker.
//!
//! Each directory is a unit of work running as its own task. A unit takes a
//! limiter slot, lists its directory on the blocking pool, sends matching
//! files to the aggregator and dispatches one new unit per kept
//! subdirectory. Children are registered with the completion tracker before
//! their parent finishes, so the tracker reaches zero exactly once, after
//! the last unit.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use filesift_core::{
    DEFAULT_CHANNEL_CAPACITY, SharedDirFilter, SharedFileFilter, WalkConfig, WalkError,
    WalkWarning, WarningKind, available_parallelism, path,
};

use crate::aggregator::{Aggregator, Discovery};
use crate::limiter::Limiter;
use crate::listing::{EntryKind, Lister, list_dir};
use crate::output::{WalkCounters, WalkOutput};
use crate::predicate;
use crate::tracker::{CompletionTracker, UnitGuard};

/// Walker that lists directories in parallel, at most `max_concurrency` at
/// a time.
#[derive(Debug, Clone)]
pub struct ConcurrentWalker {
    max_concurrency: usize,
    channel_capacity: usize,
    cancel: Option<CancellationToken>,
}

/// State shared by the units of one walk. Dropped when the walk returns.
struct WalkContext {
    limiter: Limiter,
    tracker: Arc<CompletionTracker>,
    tx: mpsc::Sender<Discovery>,
    dir_filter: SharedDirFilter,
    file_filter: SharedFileFilter,
    cancel: Option<CancellationToken>,
    counters: WalkCounters,
    lister: Lister,
}

impl WalkContext {
    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

impl ConcurrentWalker {
    /// Create a walker sized to the host's available parallelism.
    pub fn new() -> Self {
        Self {
            max_concurrency: available_parallelism(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            cancel: None,
        }
    }

    /// Create a walker from the concurrency settings of `config`.
    pub fn from_config(config: &WalkConfig) -> Self {
        Self::new()
            .with_max_concurrency(config.effective_concurrency())
            .with_channel_capacity(config.channel_capacity)
    }

    /// Set the number of listings allowed in flight (minimum 1).
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Set the result channel capacity, clamped to what a tokio channel
    /// supports (minimum 1).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    /// Abandon remaining work once `token` is cancelled.
    ///
    /// Units check the token before listing; directories already listed still
    /// contribute their files.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Number of listings allowed in flight.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Walk `root` on the current tokio runtime.
    ///
    /// Fails only if `root` cannot be resolved; unreadable directories are
    /// reported in [`WalkOutput::warnings`].
    pub async fn walk(
        &self,
        root: impl AsRef<Path>,
        dir_filter: SharedDirFilter,
        file_filter: SharedFileFilter,
    ) -> Result<WalkOutput, WalkError> {
        self.walk_with(root, dir_filter, file_filter, list_dir).await
    }

    async fn walk_with(
        &self,
        root: impl AsRef<Path>,
        dir_filter: SharedDirFilter,
        file_filter: SharedFileFilter,
        lister: Lister,
    ) -> Result<WalkOutput, WalkError> {
        let start = Instant::now();
        let root = path::normalize_root(root)?;
        debug!(
            root = %root,
            max_concurrency = self.max_concurrency,
            "Starting concurrent walk"
        );

        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let ctx = Arc::new(WalkContext {
            limiter: Limiter::new(self.max_concurrency),
            tracker: Arc::new(CompletionTracker::new()),
            tx,
            dir_filter,
            file_filter,
            cancel: self.cancel.clone(),
            counters: WalkCounters::default(),
            lister,
        });

        dispatch(&ctx, root.clone());

        let tracker = Arc::clone(&ctx.tracker);
        let collected = Aggregator::new(rx).collect(tracker.wait()).await;

        let mut stats = ctx.counters.snapshot();
        stats.units_aborted = tracker.aborted() as u64;
        stats.peak_listings = ctx.limiter.peak() as u64;
        let cancelled = ctx.is_cancelled();

        let duration = start.elapsed();
        debug!(
            files = collected.files.len(),
            warnings = collected.warnings.len(),
            peak_listings = stats.peak_listings,
            cancelled,
            duration_ms = duration.as_millis() as u64,
            "Concurrent walk completed"
        );

        Ok(WalkOutput {
            root,
            files: collected.files,
            stats,
            warnings: collected.warnings,
            duration,
            cancelled,
        })
    }

    /// Walk `root` on a dedicated runtime, blocking the calling thread.
    ///
    /// Must not be called from inside an async context.
    pub fn walk_blocking(
        &self,
        root: impl AsRef<Path>,
        dir_filter: SharedDirFilter,
        file_filter: SharedFileFilter,
    ) -> Result<WalkOutput, WalkError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("filesift-walk")
            .build()
            .map_err(WalkError::Runtime)?;
        runtime.block_on(self.walk(root, dir_filter, file_filter))
    }
}

impl Default for ConcurrentWalker {
    fn default() -> Self {
        Self::new()
    }
}

/// Register a unit for `dir` and start it.
fn dispatch(ctx: &Arc<WalkContext>, dir: String) {
    let guard = UnitGuard::register(&ctx.tracker, dir.as_str());
    let ctx = Arc::clone(ctx);
    tokio::spawn(run_unit(ctx, dir, guard));
}

async fn run_unit(ctx: Arc<WalkContext>, dir: String, _guard: UnitGuard) {
    let permit = ctx.limiter.acquire().await;
    if ctx.is_cancelled() {
        trace!(dir = %dir, "Walk cancelled, not listing");
        return;
    }

    let listing = {
        let dir = dir.clone();
        let lister = ctx.lister;
        tokio::task::spawn_blocking(move || lister(&dir)).await
    };
    let entries = match listing {
        Ok(Ok(entries)) => entries,
        Ok(Err(warning)) => {
            report_failure(&ctx, warning).await;
            return;
        }
        Err(join_error) => {
            let warning = WalkWarning::new(
                dir.as_str(),
                format!("Listing task failed: {join_error}"),
                WarningKind::ReadError,
            );
            report_failure(&ctx, warning).await;
            return;
        }
    };
    WalkCounters::bump(&ctx.counters.dirs_listed);
    trace!(dir = %dir, entries = entries.len(), "Listed directory");

    for entry in entries {
        let full = path::join(&dir, &entry.name);
        match entry.kind {
            EntryKind::Dir => {
                match predicate::dir_ignored(&*ctx.dir_filter, &full, &entry.name) {
                    Ok(true) => WalkCounters::bump(&ctx.counters.dirs_skipped),
                    Ok(false) => dispatch(&ctx, full),
                    Err(warning) => report_panic(&ctx, warning).await,
                }
            }
            EntryKind::File => {
                WalkCounters::bump(&ctx.counters.files_seen);
                match predicate::file_included(&*ctx.file_filter, &full) {
                    Ok(true) => {
                        if ctx.tx.send(Discovery::File(full)).await.is_err() {
                            return;
                        }
                        WalkCounters::bump(&ctx.counters.files_emitted);
                    }
                    Ok(false) => {}
                    Err(warning) => report_panic(&ctx, warning).await,
                }
            }
        }
    }

    // slot goes back before the unit is marked complete
    drop(permit);
}

async fn report_failure(ctx: &WalkContext, warning: WalkWarning) {
    warn!(dir = %warning.path, error = %warning.message, "Skipping unreadable directory");
    WalkCounters::bump(&ctx.counters.listing_failures);
    let _ = ctx.tx.send(Discovery::Failed(warning)).await;
}

async fn report_panic(ctx: &WalkContext, warning: WalkWarning) {
    error!(path = %warning.path, error = %warning.message, "Predicate panicked, entry skipped");
    WalkCounters::bump(&ctx.counters.predicate_panics);
    let _ = ctx.tx.send(Discovery::Failed(warning)).await;
}
