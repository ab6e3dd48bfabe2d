//! Existence and type checks used by callers before walking.
//!
//! The non-`Result` checks swallow errors: a path that cannot be stat'ed is
//! treated as absent. Note that `is_file(p)` is not `!is_dir(p)`; both are
//! false for a missing path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// True if `path` names an existing file or directory.
pub fn path_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).is_ok()
}

/// True if `path` exists and is a directory.
pub fn is_dir(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// True if `path` exists and is not a directory.
pub fn is_file(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

/// Whether an existing path is a directory; errors if it cannot be stat'ed.
pub fn existing_is_dir(path: impl AsRef<Path>) -> io::Result<bool> {
    Ok(fs::metadata(path)?.is_dir())
}

/// Whether an existing path is not a directory; errors if it cannot be stat'ed.
pub fn existing_is_file(path: impl AsRef<Path>) -> io::Result<bool> {
    existing_is_dir(path).map(|dir| !dir)
}

/// Whether a directory has no entries. Reads at most one entry.
pub fn is_dir_empty(path: impl AsRef<Path>) -> io::Result<bool> {
    let mut entries = fs::read_dir(path)?;
    match entries.next() {
        None => Ok(true),
        Some(Ok(_)) => Ok(false),
        Some(Err(e)) => Err(e),
    }
}

/// First immediate entry of `dir` whose name ends in `.suffix`.
///
/// Entries are checked in the order the platform lists them.
pub fn find_first_with_suffix(
    dir: impl AsRef<Path>,
    suffix: &str,
) -> io::Result<Option<PathBuf>> {
    let dir = dir.as_ref();
    let wanted = format!(".{suffix}");
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().ends_with(&wanted) {
            return Ok(Some(dir.join(entry.file_name())));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        assert!(!path_exists(&missing));
        assert!(!is_dir(&missing));
        assert!(!is_file(&missing));
        assert!(existing_is_dir(&missing).is_err());
        assert!(is_dir_empty(&missing).is_err());
    }

    #[test]
    fn test_file_and_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        assert!(path_exists(&file));
        assert!(is_file(&file));
        assert!(!is_dir(&file));
        assert!(existing_is_file(&file).unwrap());
        assert!(is_dir(temp.path()));
        assert!(existing_is_dir(temp.path()).unwrap());
    }

    #[test]
    fn test_is_dir_empty() {
        let temp = TempDir::new().unwrap();
        assert!(is_dir_empty(temp.path()).unwrap());

        fs::create_dir(temp.path().join("sub")).unwrap();
        assert!(!is_dir_empty(temp.path()).unwrap());
    }

    #[test]
    fn test_find_first_with_suffix() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        fs::write(temp.path().join("main.go"), "").unwrap();

        let found = find_first_with_suffix(temp.path(), "go").unwrap();
        assert_eq!(found, Some(temp.path().join("main.go")));
        assert_eq!(find_first_with_suffix(temp.path(), "rs").unwrap(), None);
    }
}
