//! Flat key-value capability traits for FlatFS.
//!
//! This is the narrow waist between the directory emulation layer and
//! whatever actually stores the data. Everything at this level is a flat
//! key and raw bytes - no hierarchy, no directory semantics, no path
//! validation.
//!
//! A backend only needs to answer five questions: get, put, delete,
//! exists, and list-by-prefix. Atomic copy is an optional sixth,
//! advertised through [`KvWrite::has_native_copy`] so callers can pick a
//! copy strategy up front instead of probing on every request.
//!
//! # Example
//!
//! ```rust
//! use flatfs_kv_store::{Bytes, KvError, KvRead};
//!
//! struct SingleKeyStore {
//!     value: Option<Bytes>,
//! }
//!
//! impl KvRead for SingleKeyStore {
//!     fn get(&mut self, key: &str) -> Result<Option<Bytes>, KvError> {
//!         Ok(if key == "the-key" { self.value.clone() } else { None })
//!     }
//!
//!     fn exists(&mut self, key: &str) -> Result<bool, KvError> {
//!         Ok(key == "the-key" && self.value.is_some())
//!     }
//!
//!     fn list_prefix(&mut self, prefix: &str) -> Result<Vec<String>, KvError> {
//!         let mut keys = Vec::new();
//!         if self.value.is_some() && "the-key".starts_with(prefix) {
//!             keys.push("the-key".to_string());
//!         }
//!         Ok(keys)
//!     }
//! }
//! ```

pub use bytes::Bytes;

mod error;
mod traits;

pub use error::KvError;
pub use traits::{KvRead, KvStore, KvWrite};
