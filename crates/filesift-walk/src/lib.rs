//! Directory walkers for filesift.
//!
//! # Overview
//!
//! Two walkers enumerate the files under a root directory and return the
//! ones the caller's predicates keep:
//!
//! - [`SequentialWalker`]: a plain depth-first recursion
//! - [`ConcurrentWalker`]: one task per directory with at most *N* listings
//!   in flight, results gathered over a bounded channel
//!
//! Both produce the same set of paths for the same tree and predicates; only
//! the order differs. Paths are absolute and use `/` as the separator.
//! Symbolic links are reported as files and never followed.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use filesift_walk::{AllFiles, ConcurrentWalker, StdIgnorer};
//!
//! let walker = ConcurrentWalker::new();
//! let output = walker
//!     .walk_blocking("/path/to/tree", Arc::new(StdIgnorer), Arc::new(AllFiles))
//!     .unwrap();
//!
//! println!("{} files", output.files.len());
//! ```

mod aggregator;
mod concurrent;
mod limiter;
mod listing;
mod output;
mod predicate;
mod sequential;
mod tracker;

use std::path::Path;

pub use concurrent::ConcurrentWalker;
pub use limiter::{Limiter, LimiterPermit};
pub use output::{WalkOutput, WalkStats};
pub use sequential::SequentialWalker;
pub use tracker::{CompletionTracker, UnitGuard};

// Re-export core types for convenience
pub use filesift_core::{
    AllFiles, DirFilter, FileFilter, GlobFilter, NameIgnorer, NoIgnorer, SharedDirFilter,
    SharedFileFilter, StdIgnorer, Strategy, WalkConfig, WalkError, WalkWarning, WarningKind,
};

/// Collect the files under `root` with the concurrent walker.
pub async fn traverse(
    root: impl AsRef<Path>,
    dir_filter: SharedDirFilter,
    file_filter: SharedFileFilter,
) -> Result<Vec<String>, WalkError> {
    ConcurrentWalker::new()
        .walk(root, dir_filter, file_filter)
        .await
        .map(WalkOutput::into_files)
}

/// Collect the files under `root` with the sequential walker.
pub fn traverse_sequential(
    root: impl AsRef<Path>,
    dir_filter: &dyn DirFilter,
    file_filter: &dyn FileFilter,
) -> Result<Vec<String>, WalkError> {
    SequentialWalker::new()
        .walk(root, dir_filter, file_filter)
        .map(WalkOutput::into_files)
}

/// Run the walk described by `config`, blocking until it finishes.
///
/// The concurrent strategy starts its own runtime, so this must not be
/// called from inside an async context.
pub fn walk(config: &WalkConfig) -> Result<WalkOutput, WalkError> {
    let dir_filter = config.dir_filter();
    let file_filter = config.file_filter()?;
    match config.strategy {
        Strategy::Sequential => {
            SequentialWalker::new().walk(&config.root, dir_filter.as_ref(), file_filter.as_ref())
        }
        Strategy::Concurrent => {
            ConcurrentWalker::from_config(config).walk_blocking(&config.root, dir_filter, file_filter)
        }
    }
}
