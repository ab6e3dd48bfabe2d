//! Error types for walk operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a walk before any directory is listed.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The root could not be resolved to an absolute path.
    #[error("Cannot resolve root {path}: {source}")]
    RootResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root path was empty.
    #[error("Root path cannot be empty")]
    EmptyRoot,

    /// The async runtime backing a blocking walk could not be started.
    #[error("Failed to start walk runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl WalkError {
    /// Create a root resolution error with path context.
    pub fn root(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RootResolution {
            path: path.into(),
            source,
        }
    }
}

/// Kind of walk warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied while listing a directory.
    PermissionDenied,
    /// The directory disappeared before it could be listed.
    NotFound,
    /// Any other error opening or reading a directory.
    ReadError,
    /// A directory or file predicate panicked on this entry.
    PredicatePanic,
}

/// Non-fatal condition encountered during a walk.
///
/// A warning means the entry at `path` (and, for a directory, everything
/// below it) contributed no files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkWarning {
    /// Directory that could not be listed, or entry a predicate failed on.
    pub path: String,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl WalkWarning {
    /// Create a new walk warning.
    pub fn new(path: impl Into<String>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Classify an I/O error raised while listing `path`.
    pub fn listing(path: impl Into<String>, error: &std::io::Error) -> Self {
        let path = path.into();
        let kind = match error.kind() {
            std::io::ErrorKind::PermissionDenied => WarningKind::PermissionDenied,
            std::io::ErrorKind::NotFound => WarningKind::NotFound,
            _ => WarningKind::ReadError,
        };
        Self {
            message: format!("Cannot list {path}: {error}"),
            path,
            kind,
        }
    }

    /// Record a predicate that panicked while judging `path`.
    pub fn predicate_panic(path: impl Into<String>, detail: &str) -> Self {
        let path = path.into();
        Self {
            message: format!("Predicate panicked on {path}: {detail}"),
            path,
            kind: WarningKind::PredicatePanic,
        }
    }
}
