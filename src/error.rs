//! Error types for root resolution and manifest persistence.
//!
//! The taxonomy keeps "the file is not there" out of the error space
//! entirely: absence is the normal loop condition of an ascent and
//! surfaces as `Ok(false)` / `Ok(None)` from the predicates. Only
//! genuine I/O failures, malformed documents, and the caller-selected
//! hard-failure mode of the package-file search become an [`Error`].

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by the resolver or the structured-file store.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed for a reason other than the path being
    /// absent (permissions, hardware, exhausted descriptors).
    #[error("filesystem error at {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A structured file exists but its content is not valid JSON.
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The upward package-file search exhausted without a match while
    /// running in [`OnMissing::Error`](crate::resolve::OnMissing) mode.
    #[error("no package file found searching upward from {}", start.display())]
    NoPackageFile { start: PathBuf },
}

impl Error {
    pub(crate) fn filesystem(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Error::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
