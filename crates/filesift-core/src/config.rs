//! Walk configuration types.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::WalkError;
use crate::filter::{GlobFilter, NameIgnorer, SharedDirFilter, SharedFileFilter};

/// Default capacity of the result channel between walk units and the aggregator.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// How the tree is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Single-threaded depth-first recursion.
    Sequential,
    /// Directory listings fanned out across tasks, bounded by a limiter.
    #[default]
    Concurrent,
}

/// Configuration for a walk.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Root directory to walk.
    pub root: PathBuf,

    /// Traversal strategy.
    #[builder(default)]
    #[serde(default)]
    pub strategy: Strategy,

    /// Maximum simultaneous directory listings (0 = available parallelism).
    #[builder(default = "0")]
    #[serde(default)]
    pub max_concurrency: usize,

    /// Capacity of the result channel.
    #[builder(default = "DEFAULT_CHANNEL_CAPACITY")]
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Skip version-control metadata directories.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub skip_vcs: bool,

    /// Directory base names to skip (`name`, `prefix*` or `*suffix`).
    #[builder(default)]
    #[serde(default)]
    pub ignore_dirs: Vec<String>,

    /// Glob patterns a file's full path must match (empty = all files).
    #[builder(default)]
    #[serde(default)]
    pub include_globs: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if self.channel_capacity == Some(0) {
            return Err("Channel capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Create a simple config for walking a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            strategy: Strategy::default(),
            max_concurrency: 0,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            skip_vcs: true,
            ignore_dirs: Vec::new(),
            include_globs: Vec::new(),
        }
    }

    /// Concurrency limit with `0` resolved to the host's available parallelism.
    pub fn effective_concurrency(&self) -> usize {
        match self.max_concurrency {
            0 => available_parallelism(),
            n => n,
        }
    }

    /// Build the directory predicate described by this config.
    pub fn dir_filter(&self) -> SharedDirFilter {
        Arc::new(NameIgnorer::new(self.ignore_dirs.iter().cloned()).with_vcs(self.skip_vcs))
    }

    /// Build the file predicate described by this config.
    pub fn file_filter(&self) -> Result<SharedFileFilter, WalkError> {
        let filter = GlobFilter::new(&self.include_globs).map_err(|e| WalkError::InvalidConfig {
            message: e.to_string(),
        })?;
        Ok(Arc::new(filter))
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Number of threads the host can run in parallel, at least 1.
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
