//! Predicate calls that contain a panicking predicate to a single entry.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use filesift_core::{DirFilter, FileFilter, WalkWarning};

/// Ask `filter` whether the subdirectory at `full` (base name `name`) is
/// skipped. A panic becomes a warning for that subdirectory.
pub(crate) fn dir_ignored(
    filter: &dyn DirFilter,
    full: &str,
    name: &str,
) -> Result<bool, WalkWarning> {
    catch_unwind(AssertUnwindSafe(|| filter.is_dir_ignored(name)))
        .map_err(|payload| WalkWarning::predicate_panic(full, panic_detail(payload.as_ref())))
}

/// Ask `filter` whether the file at `full` is kept. A panic becomes a
/// warning for that file.
pub(crate) fn file_included(filter: &dyn FileFilter, full: &str) -> Result<bool, WalkWarning> {
    catch_unwind(AssertUnwindSafe(|| filter.is_file_included(full)))
        .map_err(|payload| WalkWarning::predicate_panic(full, panic_detail(payload.as_ref())))
}

fn panic_detail(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
