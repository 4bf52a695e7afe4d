//! Path normalization utilities
//!
//! Header paths always use '/' as separator and are relative to the base directory.

use std::path::{Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory, '/'-separated.
///
/// Paths outside `root` are returned whole. `None` means the result is not
/// valid UTF-8 and cannot be written into a header.
pub fn relative_utf8(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_str().map(|s| s.replace('\\', "/"))
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Check whether two paths name the same file on disk
///
/// Falls back to plain comparison when either side cannot be canonicalized.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
