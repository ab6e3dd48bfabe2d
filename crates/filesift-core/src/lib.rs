//! Core types, predicates and path helpers for filesift.
//!
//! This crate provides what both walkers share: the predicate traits that
//! decide which subtrees are skipped and which files are kept, root
//! normalization, walk configuration, and the error and warning types.

mod config;
mod error;
mod filter;
pub mod path;
pub mod probe;

pub use config::{
    DEFAULT_CHANNEL_CAPACITY, Strategy, WalkConfig, WalkConfigBuilder, available_parallelism,
};
pub use error::{WalkError, WalkWarning, WarningKind};
pub use filter::{
    AllFiles, DirFilter, FileFilter, GlobFilter, NameIgnorer, NoIgnorer, SharedDirFilter,
    SharedFileFilter, StdIgnorer, VCS_DIRS,
};
