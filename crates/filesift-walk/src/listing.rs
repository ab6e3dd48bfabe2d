//! Single-directory listing shared by both walkers.

use std::fs;

use filesift_core::WalkWarning;

/// What a walker does with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    /// Real directory: candidate for descent.
    Dir,
    /// Anything else, symbolic links included: candidate for output.
    File,
}

#[derive(Debug, Clone)]
pub(crate) struct ListedEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Listing function used by a walk; [`list_dir`] outside tests.
pub(crate) type Lister = fn(&str) -> Result<Vec<ListedEntry>, WalkWarning>;

/// List the immediate entries of `dir`.
///
/// Symbolic links are never followed, so a link to a directory is reported
/// as a file entry. An error on any entry fails the whole listing.
pub(crate) fn list_dir(dir: &str) -> Result<Vec<ListedEntry>, WalkWarning> {
    let read_dir = fs::read_dir(dir).map_err(|e| WalkWarning::listing(dir, &e))?;
    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| WalkWarning::listing(dir, &e))?;
        let file_type = entry.file_type().map_err(|e| WalkWarning::listing(dir, &e))?;
        let kind = if file_type.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        entries.push(ListedEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filesift_core::WarningKind;
    use filesift_core::path::to_slash;
    use tempfile::TempDir;

    #[test]
    fn test_list_dir_kinds() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();

        let mut entries = list_dir(&to_slash(temp.path())).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].name, "sub");
        assert_eq!(entries[1].kind, EntryKind::Dir);
    }

    #[test]
    fn test_list_missing_dir() {
        let temp = TempDir::new().unwrap();
        let missing = to_slash(&temp.path().join("gone"));
        let warning = list_dir(&missing).unwrap_err();
        assert_eq!(warning.kind, WarningKind::NotFound);
        assert_eq!(warning.path, missing);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dir_is_a_file_entry() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link")).unwrap();

        let entries = list_dir(&to_slash(temp.path())).unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert_eq!(link.kind, EntryKind::File);
    }
}
