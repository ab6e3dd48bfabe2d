//! Directory-ignore and file-include predicates.
//!
//! Walkers only ever call these through the two traits below. Any
//! `Fn(&str) -> bool` closure that is `Send + Sync` implements both.

use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};

/// Decides whether a directory's whole subtree is skipped.
///
/// Only the directory's base name is passed, never its ancestors, so two
/// directories sharing a name are treated the same wherever they appear.
pub trait DirFilter: Send + Sync {
    fn is_dir_ignored(&self, name: &str) -> bool;
}

/// Decides whether a discovered file appears in the result.
///
/// Receives the file's full slash-normalized path.
pub trait FileFilter: Send + Sync {
    fn is_file_included(&self, path: &str) -> bool;
}

/// Shared handle to a directory predicate.
pub type SharedDirFilter = Arc<dyn DirFilter>;

/// Shared handle to a file predicate.
pub type SharedFileFilter = Arc<dyn FileFilter>;

impl<F> DirFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_dir_ignored(&self, name: &str) -> bool {
        self(name)
    }
}

impl<F> FileFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_file_included(&self, path: &str) -> bool {
        self(path)
    }
}

/// Version-control metadata directory names skipped by [`StdIgnorer`].
pub const VCS_DIRS: &[&str] = &[".git", ".svn", ".hg"];

/// Skips version-control metadata directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdIgnorer;

impl DirFilter for StdIgnorer {
    fn is_dir_ignored(&self, name: &str) -> bool {
        VCS_DIRS.contains(&name)
    }
}

/// Descends into every directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIgnorer;

impl DirFilter for NoIgnorer {
    fn is_dir_ignored(&self, _name: &str) -> bool {
        false
    }
}

/// Includes every file.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllFiles;

impl FileFilter for AllFiles {
    fn is_file_included(&self, _path: &str) -> bool {
        true
    }
}

/// Skips directories whose base name matches one of a list of patterns.
///
/// A pattern is an exact name, `prefix*`, or `*suffix`.
#[derive(Debug, Clone, Default)]
pub struct NameIgnorer {
    patterns: Vec<String>,
    skip_vcs: bool,
}

impl NameIgnorer {
    /// Create an ignorer for the given patterns.
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            skip_vcs: false,
        }
    }

    /// Also skip version-control metadata directories.
    pub fn with_vcs(mut self, skip_vcs: bool) -> Self {
        self.skip_vcs = skip_vcs;
        self
    }

    fn matches(pattern: &str, name: &str) -> bool {
        if pattern == name {
            return true;
        }
        if let Some(prefix) = pattern.strip_suffix('*') {
            if name.starts_with(prefix) {
                return true;
            }
        }
        if let Some(suffix) = pattern.strip_prefix('*') {
            if name.ends_with(suffix) {
                return true;
            }
        }
        false
    }
}

impl DirFilter for NameIgnorer {
    fn is_dir_ignored(&self, name: &str) -> bool {
        (self.skip_vcs && StdIgnorer.is_dir_ignored(name))
            || self.patterns.iter().any(|p| Self::matches(p, name))
    }
}

/// Includes files whose full path matches any of a set of glob patterns.
///
/// An empty pattern list includes everything.
#[derive(Debug, Clone)]
pub struct GlobFilter {
    set: GlobSet,
    empty: bool,
}

impl GlobFilter {
    /// Compile the given glob patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, globset::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut empty = true;
        for pattern in patterns {
            builder.add(Glob::new(pattern.as_ref())?);
            empty = false;
        }
        Ok(Self {
            set: builder.build()?,
            empty,
        })
    }
}

impl FileFilter for GlobFilter {
    fn is_file_included(&self, path: &str) -> bool {
        self.empty || self.set.is_match(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_ignorer() {
        assert!(StdIgnorer.is_dir_ignored(".git"));
        assert!(StdIgnorer.is_dir_ignored(".svn"));
        assert!(StdIgnorer.is_dir_ignored(".hg"));
        assert!(!StdIgnorer.is_dir_ignored("src"));
        assert!(!StdIgnorer.is_dir_ignored(".github"));
    }

    #[test]
    fn test_closures_are_filters() {
        let ignore_target = |name: &str| name == "target";
        let rust_only = |path: &str| path.ends_with(".rs");

        assert!(ignore_target.is_dir_ignored("target"));
        assert!(!ignore_target.is_dir_ignored("src"));
        assert!(rust_only.is_file_included("/a/lib.rs"));
        assert!(!rust_only.is_file_included("/a/lib.go"));
    }

    #[test]
    fn test_name_ignorer_patterns() {
        let ignorer = NameIgnorer::new(["node_modules", "build*", "*.cache"]);
        assert!(ignorer.is_dir_ignored("node_modules"));
        assert!(ignorer.is_dir_ignored("build-release"));
        assert!(ignorer.is_dir_ignored("pip.cache"));
        assert!(!ignorer.is_dir_ignored("src"));
        assert!(!ignorer.is_dir_ignored(".git"));

        let ignorer = ignorer.with_vcs(true);
        assert!(ignorer.is_dir_ignored(".git"));
    }

    #[test]
    fn test_glob_filter() {
        let filter = GlobFilter::new(["**/*.rs", "**/Cargo.toml"]).unwrap();
        assert!(filter.is_file_included("/w/src/lib.rs"));
        assert!(filter.is_file_included("/w/Cargo.toml"));
        assert!(!filter.is_file_included("/w/README.md"));

        let everything = GlobFilter::new(Vec::<String>::new()).unwrap();
        assert!(everything.is_file_included("/any/thing"));
    }

    #[test]
    fn test_invalid_glob() {
        assert!(GlobFilter::new(["a[b"]).is_err());
    }
}
