//! Single-threaded depth-first walker.
//!
//! This is the reference the concurrent walker is measured against: same
//! predicates, same listing, same error policy, no tasks or channels.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, error, warn};

use filesift_core::{DirFilter, FileFilter, WalkError, WalkWarning, path};

use crate::listing::{EntryKind, Lister, list_dir};
use crate::output::{WalkOutput, WalkStats};
use crate::predicate;

/// Depth-first walker that appends straight into its result.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialWalker;

struct WalkState<'a> {
    dir_filter: &'a dyn DirFilter,
    file_filter: &'a dyn FileFilter,
    lister: Lister,
    files: Vec<String>,
    warnings: Vec<WalkWarning>,
    stats: WalkStats,
}

impl SequentialWalker {
    /// Create a new sequential walker.
    pub fn new() -> Self {
        Self
    }

    /// Walk `root`, returning every file the predicates keep.
    ///
    /// Files come out in depth-first listing order. The root itself is never
    /// checked against `dir_filter`.
    pub fn walk(
        &self,
        root: impl AsRef<Path>,
        dir_filter: &dyn DirFilter,
        file_filter: &dyn FileFilter,
    ) -> Result<WalkOutput, WalkError> {
        self.walk_with(root, dir_filter, file_filter, list_dir)
    }

    fn walk_with(
        &self,
        root: impl AsRef<Path>,
        dir_filter: &dyn DirFilter,
        file_filter: &dyn FileFilter,
        lister: Lister,
    ) -> Result<WalkOutput, WalkError> {
        let start = Instant::now();
        let root = path::normalize_root(root)?;
        debug!(root = %root, "Starting sequential walk");

        let mut state = WalkState {
            dir_filter,
            file_filter,
            lister,
            files: Vec::new(),
            warnings: Vec::new(),
            stats: WalkStats::default(),
        };
        self.visit(&root, &mut state);

        let duration = start.elapsed();
        debug!(
            files = state.files.len(),
            warnings = state.warnings.len(),
            duration_ms = duration.as_millis() as u64,
            "Sequential walk completed"
        );

        Ok(WalkOutput {
            root,
            files: state.files,
            stats: state.stats,
            warnings: state.warnings,
            duration,
            cancelled: false,
        })
    }

    fn visit(&self, dir: &str, state: &mut WalkState<'_>) {
        let entries = match (state.lister)(dir) {
            Ok(entries) => entries,
            Err(warning) => {
                warn!(dir = %dir, error = %warning.message, "Skipping unreadable directory");
                state.stats.listing_failures += 1;
                state.warnings.push(warning);
                return;
            }
        };
        state.stats.dirs_listed += 1;
        state.stats.peak_listings = 1;

        for entry in entries {
            let full = path::join(dir, &entry.name);
            match entry.kind {
                EntryKind::Dir => {
                    match predicate::dir_ignored(state.dir_filter, &full, &entry.name) {
                        Ok(true) => state.stats.dirs_skipped += 1,
                        Ok(false) => self.visit(&full, state),
                        Err(warning) => state.predicate_panicked(warning),
                    }
                }
                EntryKind::File => {
                    state.stats.files_seen += 1;
                    match predicate::file_included(state.file_filter, &full) {
                        Ok(true) => {
                            state.stats.files_emitted += 1;
                            state.files.push(full);
                        }
                        Ok(false) => {}
                        Err(warning) => state.predicate_panicked(warning),
                    }
                }
            }
        }
    }
}

impl WalkState<'_> {
    fn predicate_panicked(&mut self, warning: WalkWarning) {
        error!(path = %warning.path, error = %warning.message, "Predicate panicked, entry skipped");
        self.stats.predicate_panics += 1;
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListedEntry;
    use filesift_core::{AllFiles, NoIgnorer, StdIgnorer, WarningKind};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("dir1/subdir")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world").unwrap();
        fs::write(root.join("dir1/subdir/file3.rs"), "fn main() {}").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another").unwrap();
        fs::write(root.join(".git/HEAD"), "ref").unwrap();

        temp
    }

    #[test]
    fn test_basic_walk() {
        let temp = create_test_tree();
        let output = SequentialWalker::new()
            .walk(temp.path(), &StdIgnorer, &AllFiles)
            .unwrap();

        assert_eq!(output.files.len(), 4);
        assert_eq!(output.stats.dirs_listed, 4);
        assert_eq!(output.stats.dirs_skipped, 1);
        assert!(output.files.iter().all(|f| f.starts_with(&output.root)));
        assert!(output.files.iter().all(|f| !f.contains("/.git/")));
    }

    #[test]
    fn test_no_ignorer_includes_vcs() {
        let temp = create_test_tree();
        let output = SequentialWalker::new()
            .walk(temp.path(), &NoIgnorer, &AllFiles)
            .unwrap();
        assert_eq!(output.files.len(), 5);
    }

    #[test]
    fn test_file_filter_sees_full_path() {
        let temp = create_test_tree();
        let rust_only = |p: &str| p.ends_with(".rs") && p.contains("/dir1/subdir/");
        let output = SequentialWalker::new()
            .walk(temp.path(), &StdIgnorer, &rust_only)
            .unwrap();

        assert_eq!(output.files.len(), 1);
        assert!(output.files[0].ends_with("/dir1/subdir/file3.rs"));
        assert_eq!(output.stats.files_seen, 4);
    }

    #[test]
    fn test_missing_root_is_warning() {
        let temp = TempDir::new().unwrap();
        let output = SequentialWalker::new()
            .walk(temp.path().join("absent"), &StdIgnorer, &AllFiles)
            .unwrap();

        assert!(output.files.is_empty());
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.stats.listing_failures, 1);
    }

    fn dir1_fails(dir: &str) -> Result<Vec<ListedEntry>, WalkWarning> {
        if dir.ends_with("/dir1") {
            return Err(WalkWarning::new(dir, "Cannot list: I/O error", WarningKind::ReadError));
        }
        list_dir(dir)
    }

    #[test]
    fn test_failing_subdirectory_keeps_siblings() {
        let temp = create_test_tree();
        let output = SequentialWalker::new()
            .walk_with(temp.path(), &StdIgnorer, &AllFiles, dir1_fails)
            .unwrap();

        let mut names: Vec<_> = output
            .files
            .iter()
            .map(|f| f.rsplit('/').next().unwrap())
            .collect();
        names.sort_unstable();
        assert_eq!(names, ["file1.txt", "file4.txt"]);

        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].kind, WarningKind::ReadError);
        assert!(output.warnings[0].path.ends_with("/dir1"));
        assert_eq!(output.stats.listing_failures, 1);
        assert_eq!(output.stats.dirs_listed, 2);
    }

    #[test]
    fn test_panicking_dir_predicate_skips_that_directory() {
        let temp = create_test_tree();
        let picky = |name: &str| -> bool {
            if name == "dir2" {
                panic!("cannot judge {name}");
            }
            name == ".git"
        };
        let output = SequentialWalker::new()
            .walk(temp.path(), &picky, &AllFiles)
            .unwrap();

        assert_eq!(output.files.len(), 3);
        assert!(output.files.iter().all(|f| !f.contains("/dir2/")));
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].kind, WarningKind::PredicatePanic);
        assert!(output.warnings[0].path.ends_with("/dir2"));
        assert_eq!(output.stats.predicate_panics, 1);
    }

    #[test]
    fn test_empty_root_is_an_error() {
        let result = SequentialWalker::new().walk("", &StdIgnorer, &AllFiles);
        assert!(matches!(result, Err(WalkError::EmptyRoot)));
    }
}
