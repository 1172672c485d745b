//! FlatFS: a hierarchical filesystem view over flat key-value stores.
//!
//! FlatFS lets a document host treat any store that can get, put, delete,
//! and list keys by prefix as a filesystem with paths, directories, and
//! files. Directories are emulated with prefix scans and zero-byte marker
//! objects; every durable byte lives in the backend.
//!
//! # Example
//!
//! ```rust
//! use flatfs::{Bytes, KvFs, KvFsConfig, MemoryStore};
//!
//! let mut fs = KvFs::new(MemoryStore::new(), KvFsConfig::default()).unwrap();
//!
//! fs.mkdir("notes").unwrap();
//! fs.write("notes/x.txt", Bytes::from_static(b"hi")).unwrap();
//!
//! assert!(fs.isdir("notes").unwrap());
//! assert_eq!(fs.read("notes/x.txt").unwrap(), Bytes::from_static(b"hi"));
//!
//! fs.cp("notes", "archive").unwrap();
//! fs.rm("notes").unwrap();
//! assert_eq!(fs.read("archive/x.txt").unwrap(), Bytes::from_static(b"hi"));
//! ```

pub use flatfs_core::{
    Bytes, Error, KeyCodec, KvError, KvFs, KvFsConfig, KvRead, KvStore, KvWrite, Path, PathError,
    DEFAULT_DIR_MARKER, DELIMITER,
};
pub use flatfs_local_store::{DiskStore, DiskStoreError, MemoryStore};
