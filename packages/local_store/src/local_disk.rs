//! Local-disk key-value backend.

use std::{fs, io, path};

use bytes::Bytes;
use flatfs_kv_store::{KvError, KvRead, KvWrite};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Bytes escaped in on-disk file names: the escape character itself, the
/// platform path separators, and control bytes. Keys keep their
/// delimiters, so the whole key collapses into one file name and the
/// directory stays flat no matter how deep the emulated tree is.
const FILE_NAME_SET: &AsciiSet = &CONTROLS.add(b'%').add(b'/').add(b'\\');

#[derive(thiserror::Error, Debug)]
pub enum DiskStoreError {
    #[error("cannot use root path {}: {error}", .path.display())]
    RootPathInvalid {
        path: path::PathBuf,
        error: io::Error,
    },
}

/// One file per key under a single directory.
///
/// No native copy, so emulation layers built on top fall back to
/// read-then-write.
pub struct DiskStore {
    root: path::PathBuf,
}

impl DiskStore {
    /// Open a store rooted at `root`, which must be an existing writable
    /// directory.
    pub fn new(root: path::PathBuf) -> Result<DiskStore, DiskStoreError> {
        let attr = fs::metadata(&root).map_err(|error| DiskStoreError::RootPathInvalid {
            path: root.clone(),
            error,
        })?;

        if !attr.is_dir() {
            return Err(DiskStoreError::RootPathInvalid {
                path: root,
                error: io::Error::other("root path must be a directory"),
            });
        }

        if attr.permissions().readonly() {
            return Err(DiskStoreError::RootPathInvalid {
                path: root,
                error: io::Error::other("root directory must be writable"),
            });
        }

        match root.canonicalize() {
            Ok(root) => Ok(DiskStore { root }),
            Err(error) => Err(DiskStoreError::RootPathInvalid { path: root, error }),
        }
    }

    fn file_path(&self, key: &str) -> path::PathBuf {
        self.root
            .join(utf8_percent_encode(key, FILE_NAME_SET).to_string())
    }

    fn key_for(file_name: &str) -> Option<String> {
        percent_decode_str(file_name)
            .decode_utf8()
            .ok()
            .map(|k| k.into_owned())
    }
}

impl KvRead for DiskStore {
    fn get(&mut self, key: &str) -> Result<Option<Bytes>, KvError> {
        let file_path = self.file_path(key);
        log::debug!("reading {}", file_path.display());
        match fs::read(&file_path) {
            Ok(data) => Ok(Some(data.into())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&mut self, key: &str) -> Result<bool, KvError> {
        Ok(self.file_path(key).is_file())
    }

    fn list_prefix(&mut self, prefix: &str) -> Result<Vec<String>, KvError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(KvError::from)? {
            let entry = entry.map_err(KvError::from)?;
            if !entry.file_type().map_err(KvError::from)?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            // Skip files this store did not write.
            let Some(key) = Self::key_for(name) else {
                continue;
            };
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl KvWrite for DiskStore {
    fn put(&mut self, key: &str, data: Bytes) -> Result<(), KvError> {
        let file_path = self.file_path(key);
        log::debug!("writing {} bytes to {}", data.len(), file_path.display());
        fs::write(&file_path, &data).map_err(KvError::from)
    }

    fn delete(&mut self, key: &str) -> Result<(), KvError> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
