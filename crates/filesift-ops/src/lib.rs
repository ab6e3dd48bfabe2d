//! File copy routines for filesift.
//!
//! These sit beside the walkers: a caller typically enumerates a tree with
//! `filesift-walk` and then copies the selected paths somewhere else.

mod copy;

use std::path::PathBuf;

use thiserror::Error;

pub use copy::{copy_entry, copy_file, ensure_dir};

/// Errors from copy operations.
#[derive(Debug, Error)]
pub enum CopyError {
    /// Source does not exist.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Source was expected to be a file.
    #[error("Not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CopyError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}
