//! Error type for the key-value capability layer.
//!
//! Errors at this level are transport-focused: connectivity, permissions,
//! quota. Semantic errors like "no such file" or "invalid path" belong to
//! the emulation layer above, which never interprets or retries what it
//! sees here.

/// Errors surfaced by a key-value backend.
#[derive(Debug)]
pub enum KvError {
    /// Generic I/O or transport failure.
    ///
    /// Use this for network errors, file I/O errors, permission failures.
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// The operation is not supported by this store.
    ///
    /// For example, native copy on a store that never advertised it.
    NotSupported,

    /// Resource limit exceeded.
    ///
    /// Storage quota, too many keys, value too large.
    ResourceExhausted,
}

impl std::fmt::Display for KvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KvError::Transport(e) => write!(f, "transport error: {}", e),
            KvError::NotSupported => write!(f, "operation not supported"),
            KvError::ResourceExhausted => write!(f, "resource exhausted"),
        }
    }
}

impl std::error::Error for KvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KvError::Transport(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KvError {
    fn from(e: std::io::Error) -> Self {
        KvError::Transport(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_works() {
        let e = KvError::NotSupported;
        assert_eq!(format!("{}", e), "operation not supported");

        let e = KvError::ResourceExhausted;
        assert_eq!(format!("{}", e), "resource exhausted");
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "key not found");
        let kv_err: KvError = io_err.into();
        assert!(matches!(kv_err, KvError::Transport(_)));
        assert!(format!("{}", kv_err).contains("key not found"));
    }

    #[test]
    fn transport_error_has_source() {
        use std::error::Error as _;

        let e: KvError = std::io::Error::other("backend down").into();
        assert!(e.source().is_some());
        assert!(KvError::NotSupported.source().is_none());
    }
}
