//! In-memory key-value backend.

use std::collections::BTreeMap;
use std::io;

use bytes::Bytes;
use flatfs_kv_store::{KvError, KvRead, KvWrite};

/// An in-memory store over an ordered map.
///
/// Prefix listings come back in lexicographic key order, the same order
/// S3-style stores yield. Copy is native (a clone of the value under a
/// new key, atomic with respect to this handle), so emulation layers
/// built on top select their native-copy strategy.
///
/// # Example
///
/// ```rust
/// use flatfs_kv_store::{Bytes, KvRead, KvWrite};
/// use flatfs_local_store::MemoryStore;
///
/// let mut store = MemoryStore::new();
/// store.put("greeting", Bytes::from_static(b"hello")).unwrap();
/// assert_eq!(store.get("greeting").unwrap(), Some(Bytes::from_static(b"hello")));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: BTreeMap<String, Bytes>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Snapshot of every stored key, in order. Handy for assertions.
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }
}

impl KvRead for MemoryStore {
    fn get(&mut self, key: &str) -> Result<Option<Bytes>, KvError> {
        Ok(self.data.get(key).cloned())
    }

    fn exists(&mut self, key: &str) -> Result<bool, KvError> {
        Ok(self.data.contains_key(key))
    }

    fn list_prefix(&mut self, prefix: &str) -> Result<Vec<String>, KvError> {
        // Keys sharing a prefix are contiguous in an ordered map, so one
        // range scan suffices.
        Ok(self
            .data
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}

impl KvWrite for MemoryStore {
    fn put(&mut self, key: &str, data: Bytes) -> Result<(), KvError> {
        self.data.insert(key.to_string(), data);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), KvError> {
        self.data.remove(key);
        Ok(())
    }

    fn copy(&mut self, src: &str, dst: &str) -> Result<(), KvError> {
        match self.data.get(src).cloned() {
            Some(data) => {
                self.data.insert(dst.to_string(), data);
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such key: {}", src),
            )
            .into()),
        }
    }

    fn has_native_copy(&self) -> bool {
        true
    }
}
