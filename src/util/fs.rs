//! Filesystem existence predicates.
//!
//! Absence is a result here, not an error: `NotFound` from the OS maps
//! to `false`/`None`, anything else propagates so a permission problem
//! on one directory aborts the whole ascent instead of being skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Check whether `path` exists and is a regular file.
///
/// Symlinks are followed, so a dangling symlink counts as absent. A
/// directory at `path` is `false`, not an error.
pub fn file_exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(Error::filesystem(path, err)),
    }
}

/// Return the full path of the first of `candidates` that exists as a
/// regular file inside `dir`, or `None` if none do.
///
/// Order is the caller's preference order; the first hit wins.
pub fn find_first_existing<S: AsRef<Path>>(candidates: &[S], dir: &Path) -> Result<Option<PathBuf>> {
    for candidate in candidates {
        let path = dir.join(candidate.as_ref());
        if file_exists(&path)? {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
