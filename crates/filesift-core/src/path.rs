//! Root normalization and slash-separated path helpers.
//!
//! Every path a walker emits is rooted at the string produced by
//! [`normalize_root`]: absolute, lexically cleaned, and using `/` as the
//! separator on every platform.

use std::path::{Component, Path, PathBuf};

use crate::error::WalkError;

/// Resolve `root` to an absolute, slash-separated form.
///
/// Relative roots are resolved against the current directory. `.` and `..`
/// components are removed lexically, so symbolic links in the root are not
/// resolved. An empty root is rejected with [`WalkError::EmptyRoot`] rather
/// than read as the current directory.
pub fn normalize_root(root: impl AsRef<Path>) -> Result<String, WalkError> {
    let root = root.as_ref();
    if root.as_os_str().is_empty() {
        return Err(WalkError::EmptyRoot);
    }
    let absolute = std::path::absolute(root).map_err(|e| WalkError::root(root, e))?;
    Ok(to_slash(&clean(&absolute)))
}

/// Remove `.` and `..` components without touching the filesystem.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Render a path with `/` separators.
pub fn to_slash(path: &Path) -> String {
    let lossy = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        lossy.into_owned()
    } else {
        lossy.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Join a base name onto a slash-normalized directory.
pub fn join(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}
