//! Capability traits for flat key-value backends.

use bytes::Bytes;

use crate::KvError;

/// Read-side capabilities of a flat key-value backend.
///
/// Keys are opaque flat strings; nothing at this level implies hierarchy.
/// Absence of a key is a normal answer, not an error.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn KvRead>`.
pub trait KvRead: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The key is absent (not an error condition).
    /// * `Ok(Some(bytes))` - The stored value.
    /// * `Err(KvError)` - A transport or system error occurred.
    fn get(&mut self, key: &str) -> Result<Option<Bytes>, KvError>;

    /// Check whether `key` is present without fetching its value.
    fn exists(&mut self, key: &str) -> Result<bool, KvError>;

    /// List every stored key that starts with `prefix`.
    ///
    /// An empty prefix lists the whole store. Order is whatever the
    /// backend yields - the reference stores return lexicographic order,
    /// but callers must not depend on it.
    fn list_prefix(&mut self, prefix: &str) -> Result<Vec<String>, KvError>;
}

/// Write-side capabilities of a flat key-value backend.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn KvWrite>`.
pub trait KvWrite: Send + Sync {
    /// Store `data` under `key`, creating or overwriting.
    fn put(&mut self, key: &str, data: Bytes) -> Result<(), KvError>;

    /// Remove `key`. Deleting an absent key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), KvError>;

    /// Copy `src` to `dst` inside the backend, atomically.
    ///
    /// Only meaningful when [`KvWrite::has_native_copy`] returns true; the
    /// default implementation reports [`KvError::NotSupported`].
    fn copy(&mut self, src: &str, dst: &str) -> Result<(), KvError> {
        let _ = (src, dst);
        Err(KvError::NotSupported)
    }

    /// Whether this backend implements [`KvWrite::copy`] natively.
    ///
    /// Probed once when an emulation layer is constructed, so stores must
    /// answer consistently for their whole lifetime.
    fn has_native_copy(&self) -> bool {
        false
    }
}

/// Combined read/write capability bundle.
///
/// Automatically implemented for any type that implements both [`KvRead`]
/// and [`KvWrite`].
pub trait KvStore: KvRead + KvWrite {}
impl<T: KvRead + KvWrite> KvStore for T {}

// Blanket implementations for references and boxes

impl<T: KvRead + ?Sized> KvRead for &mut T {
    fn get(&mut self, key: &str) -> Result<Option<Bytes>, KvError> {
        (*self).get(key)
    }

    fn exists(&mut self, key: &str) -> Result<bool, KvError> {
        (*self).exists(key)
    }

    fn list_prefix(&mut self, prefix: &str) -> Result<Vec<String>, KvError> {
        (*self).list_prefix(prefix)
    }
}

impl<T: KvWrite + ?Sized> KvWrite for &mut T {
    fn put(&mut self, key: &str, data: Bytes) -> Result<(), KvError> {
        (*self).put(key, data)
    }

    fn delete(&mut self, key: &str) -> Result<(), KvError> {
        (*self).delete(key)
    }

    fn copy(&mut self, src: &str, dst: &str) -> Result<(), KvError> {
        (*self).copy(src, dst)
    }

    fn has_native_copy(&self) -> bool {
        (**self).has_native_copy()
    }
}

impl<T: KvRead + ?Sized> KvRead for Box<T> {
    fn get(&mut self, key: &str) -> Result<Option<Bytes>, KvError> {
        self.as_mut().get(key)
    }

    fn exists(&mut self, key: &str) -> Result<bool, KvError> {
        self.as_mut().exists(key)
    }

    fn list_prefix(&mut self, prefix: &str) -> Result<Vec<String>, KvError> {
        self.as_mut().list_prefix(prefix)
    }
}

impl<T: KvWrite + ?Sized> KvWrite for Box<T> {
    fn put(&mut self, key: &str, data: Bytes) -> Result<(), KvError> {
        self.as_mut().put(key, data)
    }

    fn delete(&mut self, key: &str) -> Result<(), KvError> {
        self.as_mut().delete(key)
    }

    fn copy(&mut self, src: &str, dst: &str) -> Result<(), KvError> {
        self.as_mut().copy(src, dst)
    }

    fn has_native_copy(&self) -> bool {
        self.as_ref().has_native_copy()
    }
}
