//! FlatFS core: directory semantics over a flat key namespace.
//!
//! This layer adds hierarchy to the raw keys of the KV layer:
//! - [`Path`]: normalized slash-delimited path; the empty path is the
//!   store root
//! - [`KeyCodec`]: reversible path-to-key translation under a fixed
//!   prefix
//! - [`KvFs`]: file and directory CRUD composed from primitive key-value
//!   operations
//!
//! Directories are emulated, not stored: a path is a directory when any
//! key lives below it, or when its zero-byte marker object exists (how
//! `mkdir` makes an empty directory visible). Nothing here holds durable
//! state - every byte lives in the backend, and other clients of the same
//! store are visible immediately and without coordination.
//!
//! # Example
//!
//! ```rust
//! use flatfs_core::{Error, KvFs, KvStore};
//!
//! fn publish(fs: &mut KvFs<impl KvStore>, body: flatfs_core::Bytes) -> Result<(), Error> {
//!     fs.mkdir("posts")?;
//!     fs.write("posts/draft.md", body)
//! }
//! ```

mod error;
mod fs;
mod keys;
mod path;

pub use error::Error;
pub use fs::{KvFs, KvFsConfig, DEFAULT_DIR_MARKER};
pub use keys::{KeyCodec, DELIMITER};
pub use path::{Path, PathError};

// Re-export KV types for convenience
pub use flatfs_kv_store::{Bytes, KvError, KvRead, KvStore, KvWrite};
