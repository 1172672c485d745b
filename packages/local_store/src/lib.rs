//! Reference key-value backends for FlatFS.
//!
//! Two stores that satisfy the capability traits end to end:
//! [`MemoryStore`] for tests and ephemeral use (with native copy), and
//! [`DiskStore`] for a flat one-file-per-key directory on local disk
//! (without, so it exercises the read-then-write copy fallback).

pub mod in_memory;
pub mod local_disk;

pub use in_memory::MemoryStore;
pub use local_disk::{DiskStore, DiskStoreError};
