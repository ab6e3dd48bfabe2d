use std::fs;

use filesift_ops::{CopyError, copy_entry, copy_file, ensure_dir};
use filesift_walk::{StdIgnorer, traverse_sequential};
use tempfile::TempDir;

#[test]
fn test_mirror_walked_files() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::create_dir_all(src.path().join("docs/guide")).unwrap();
    fs::create_dir_all(src.path().join(".git")).unwrap();
    fs::write(src.path().join("docs/guide/intro.md"), "# intro").unwrap();
    fs::write(src.path().join("notes.md"), "notes").unwrap();
    fs::write(src.path().join("skip.log"), "log").unwrap();
    fs::write(src.path().join(".git/HEAD"), "ref").unwrap();

    let markdown = |path: &str| path.ends_with(".md");
    let files = traverse_sequential(src.path(), &StdIgnorer, &markdown).unwrap();
    assert_eq!(files.len(), 2);

    let root = filesift_core::path::normalize_root(src.path()).unwrap();
    for file in &files {
        let relative = file.strip_prefix(&root).unwrap().trim_start_matches('/');
        copy_file(file, dst.path().join(relative), true).unwrap();
    }

    assert_eq!(
        fs::read_to_string(dst.path().join("docs/guide/intro.md")).unwrap(),
        "# intro"
    );
    assert!(dst.path().join("notes.md").is_file());
    assert!(!dst.path().join("skip.log").exists());
    assert!(!dst.path().join(".git").exists());
}

#[test]
fn test_ensure_dir_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("a/b/c");
    ensure_dir(&dir).unwrap();
    ensure_dir(&dir).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn test_copy_entry_file_overwrites() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src.txt");
    let dst = temp.path().join("dst.txt");
    fs::write(&src, "new").unwrap();
    fs::write(&dst, "old contents").unwrap();

    copy_entry(&src, &dst).unwrap();
    assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
}

#[test]
fn test_copy_file_unchecked_missing_source() {
    let temp = TempDir::new().unwrap();
    let err = copy_file(temp.path().join("absent"), temp.path().join("out"), false).unwrap_err();
    assert!(matches!(err, CopyError::NotFound { .. }));
}
