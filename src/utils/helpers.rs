//! Helper utility functions

use crate::error::SwapError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Create a directory and its parents; an existing directory is fine
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Remove a file, reporting whether anything was there
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Rename a file, failing fast when the source is gone or the target is
/// occupied instead of letting the platform silently replace it
pub fn move_file(from: &Path, to: &Path) -> Result<(), SwapError> {
    if !from.is_file() {
        return Err(SwapError::SourceMissing {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }
    if to.exists() {
        return Err(SwapError::TargetExists {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    tracing::debug!(from = %from.display(), to = %to.display(), "renaming");
    fs::rename(from, to).map_err(|source| SwapError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}
