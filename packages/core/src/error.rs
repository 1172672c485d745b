//! Error types for the emulation layer.

use flatfs_kv_store::KvError;

use crate::path::PathError;

/// Errors surfaced by [`crate::KvFs`] operations.
///
/// Backend failures pass through unmodified; this layer adds no retry and
/// no partial-failure recovery.
#[derive(Debug)]
pub enum Error {
    /// Path or key translation failure.
    Path(PathError),

    /// A read was requested on a path that is not currently a file.
    NoSuchFile { path: String },

    /// Failure surfaced from the underlying store.
    Backend(KvError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Path(e) => write!(f, "path error: {}", e),
            Error::NoSuchFile { path } => write!(f, "no such file: '{}'", path),
            Error::Backend(e) => write!(f, "backend error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Path(e) => Some(e),
            Error::Backend(e) => Some(e),
            Error::NoSuchFile { .. } => None,
        }
    }
}

impl From<PathError> for Error {
    fn from(e: PathError) -> Self {
        Error::Path(e)
    }
}

impl From<KvError> for Error {
    fn from(e: KvError) -> Self {
        Error::Backend(e)
    }
}
