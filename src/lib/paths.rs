//! Shared helpers for resolving configured paths.

use std::path::{Path, PathBuf};

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_under(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    base.join(path)
}

/// Returns true if the path has no components.
pub fn is_empty(path: &Path) -> bool {
    path.as_os_str().is_empty()
}
