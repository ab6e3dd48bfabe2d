//! File and directory copy routines.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use filesift_core::probe;
use tracing::debug;

use crate::CopyError;

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: impl AsRef<Path>) -> Result<(), CopyError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| CopyError::io(dir, e))
}

/// Copy the contents of file `src` to `dst`, creating `dst`'s parent.
///
/// With `check` set, `src` must be an existing non-directory. The
/// destination is synced to disk before returning. Returns the number of
/// bytes copied.
pub fn copy_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    check: bool,
) -> Result<u64, CopyError> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if check && !probe::is_file(src) {
        return Err(CopyError::NotAFile {
            path: src.to_path_buf(),
        });
    }
    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let mut input = File::open(src).map_err(|e| CopyError::io(src, e))?;
    let mut output = File::create(dst).map_err(|e| CopyError::io(dst, e))?;
    let bytes = io::copy(&mut input, &mut output).map_err(|e| CopyError::io(dst, e))?;
    output.sync_all().map_err(|e| CopyError::io(dst, e))?;

    debug!(src = %src.display(), dst = %dst.display(), bytes, "Copied file");
    Ok(bytes)
}

/// Copy a single entry: a directory becomes an (empty) directory at `dst`,
/// a file is copied with [`copy_file`].
pub fn copy_entry(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<(), CopyError> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if probe::is_dir(src) {
        ensure_dir(dst)
    } else if probe::is_file(src) {
        copy_file(src, dst, false).map(|_| ())
    } else {
        Err(CopyError::NotFound {
            path: src.to_path_buf(),
        })
    }
}
