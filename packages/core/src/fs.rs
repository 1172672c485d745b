//! Directory emulation over a flat key-value backend.

use std::collections::BTreeSet;

use bytes::Bytes;
use flatfs_kv_store::KvStore;

use crate::error::Error;
use crate::keys::KeyCodec;
use crate::path::{Path, PathError};

/// Default name of the zero-byte object that marks an empty directory.
pub const DEFAULT_DIR_MARKER: &str = ".kvkeep";

/// Immutable construction-time configuration for [`KvFs`].
#[derive(Debug, Clone)]
pub struct KvFsConfig {
    /// Path prefix inside the backend's key namespace. Every key this
    /// instance touches lives below it. Empty means the whole namespace.
    pub prefix: String,

    /// File name of the zero-byte marker `mkdir` writes. Must be a single
    /// path segment.
    pub dir_marker: String,
}

impl Default for KvFsConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            dir_marker: DEFAULT_DIR_MARKER.to_string(),
        }
    }
}

/// How file content moves during `cp`, selected once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyStrategy {
    /// The backend advertised an atomic native copy.
    Native,
    /// Get-then-put. Not atomic: a concurrent delete of the source
    /// between the two requests surfaces as a missing file.
    ReadThenWrite,
}

/// A hierarchical filesystem view over a flat key-value store.
///
/// Paths map reversibly to keys; directories are emulated by prefix
/// scanning plus a zero-byte marker object for directories with no other
/// content. The instance owns the backend handle but no durable state of
/// its own - everything lives in the store, and concurrent clients of the
/// same store are visible immediately and without coordination.
///
/// Every operation is one or more independent backend requests. Multi-key
/// operations (`rm`, `cp` on directories) run sequentially with no
/// atomicity across the set; a mid-sequence error surfaces to the caller
/// with the remainder unprocessed.
///
/// # Example
///
/// ```rust
/// use flatfs_core::{Bytes, KvFs, KvFsConfig};
/// # use std::collections::BTreeMap;
/// # use flatfs_core::{KvError, KvRead, KvWrite};
/// # #[derive(Default)]
/// # struct MemStore(BTreeMap<String, Bytes>);
/// # impl KvRead for MemStore {
/// #     fn get(&mut self, key: &str) -> Result<Option<Bytes>, KvError> {
/// #         Ok(self.0.get(key).cloned())
/// #     }
/// #     fn exists(&mut self, key: &str) -> Result<bool, KvError> {
/// #         Ok(self.0.contains_key(key))
/// #     }
/// #     fn list_prefix(&mut self, prefix: &str) -> Result<Vec<String>, KvError> {
/// #         Ok(self.0.keys().filter(|k| k.starts_with(prefix)).cloned().collect())
/// #     }
/// # }
/// # impl KvWrite for MemStore {
/// #     fn put(&mut self, key: &str, data: Bytes) -> Result<(), KvError> {
/// #         self.0.insert(key.to_string(), data);
/// #         Ok(())
/// #     }
/// #     fn delete(&mut self, key: &str) -> Result<(), KvError> {
/// #         self.0.remove(key);
/// #         Ok(())
/// #     }
/// # }
///
/// let mut fs = KvFs::new(MemStore::default(), KvFsConfig::default()).unwrap();
/// fs.mkdir("notes").unwrap();
/// fs.write("notes/x.txt", Bytes::from_static(b"hi")).unwrap();
/// assert!(fs.isdir("notes").unwrap());
/// assert_eq!(fs.read("notes/x.txt").unwrap(), Bytes::from_static(b"hi"));
/// ```
pub struct KvFs<S> {
    store: S,
    keys: KeyCodec,
    dir_marker: String,
    copy: CopyStrategy,
}

impl<S: KvStore> KvFs<S> {
    /// Wrap `store`, probing its native-copy capability once.
    ///
    /// When a prefix is configured, the root directory marker is written
    /// immediately so the prefix is visible as a directory before any
    /// file exists under it.
    pub fn new(store: S, config: KvFsConfig) -> Result<Self, Error> {
        let prefix = Path::parse(&config.prefix)?;

        let marker = Path::parse(&config.dir_marker)?;
        if marker.len() != 1 {
            return Err(PathError::InvalidSegment {
                segment: config.dir_marker.clone(),
                position: 0,
                message: "directory marker must be a single path segment".to_string(),
            }
            .into());
        }

        let copy = if store.has_native_copy() {
            CopyStrategy::Native
        } else {
            CopyStrategy::ReadThenWrite
        };

        let mut fs = Self {
            store,
            keys: KeyCodec::new(&prefix),
            dir_marker: config.dir_marker,
            copy,
        };
        if !prefix.is_root() {
            fs.mkdir("")?;
        }
        Ok(fs)
    }

    /// Shared access to the backend handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Exclusive access to the backend handle.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the wrapper and return the backend handle.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Flat key for `path`.
    pub fn as_key(&self, path: &str) -> Result<String, Error> {
        let path = Path::parse(path)?;
        Ok(self.keys.as_key(&path))
    }

    /// Path for a flat key, the inverse of [`KvFs::as_key`].
    ///
    /// Fails for keys outside the configured prefix and for keys that are
    /// not canonical encodings.
    pub fn as_path(&self, key: &str) -> Result<Path, Error> {
        Ok(self.keys.as_path(key)?)
    }

    /// Whether `path` is currently a file.
    ///
    /// True iff the path maps to a non-empty key that is present in the
    /// store. Read-only.
    pub fn isfile(&mut self, path: &str) -> Result<bool, Error> {
        log::debug!("checking if `{}` is a file", path);
        let key = self.as_key(path)?;
        Ok(!key.is_empty() && self.store.exists(&key)?)
    }

    /// Whether `path` is currently a directory.
    ///
    /// The root is always a directory. Anything else is a directory when
    /// its marker key exists or when any key lives below it.
    pub fn isdir(&mut self, path: &str) -> Result<bool, Error> {
        log::debug!("checking if `{}` is a directory", path);
        let dir = Path::parse(path)?;
        if dir.is_root() {
            return Ok(true);
        }
        let marker = self.marker_key(&dir)?;
        if self.store.exists(&marker)? {
            return Ok(true);
        }
        let prefix = self.keys.dir_prefix(&dir);
        Ok(!self.store.list_prefix(&prefix)?.is_empty())
    }

    /// Create directory `path` by writing its zero-byte marker.
    ///
    /// Idempotent: repeating the call rewrites the same marker key and
    /// changes nothing observable.
    pub fn mkdir(&mut self, path: &str) -> Result<(), Error> {
        log::debug!("creating directory `{}`", path);
        let dir = Path::parse(path)?;
        let marker = self.marker_key(&dir)?;
        self.store.put(&marker, Bytes::new())?;
        Ok(())
    }

    /// Content stored at `path`.
    ///
    /// The existence check and the read are separate backend requests; a
    /// delete racing in between surfaces as [`Error::NoSuchFile`].
    pub fn read(&mut self, path: &str) -> Result<Bytes, Error> {
        log::debug!("reading `{}`", path);
        if !self.isfile(path)? {
            return Err(Error::NoSuchFile {
                path: path.to_string(),
            });
        }
        let key = self.as_key(path)?;
        match self.store.get(&key)? {
            Some(data) => Ok(data),
            None => Err(Error::NoSuchFile {
                path: path.to_string(),
            }),
        }
    }

    /// Store `content` at `path`, creating or overwriting.
    ///
    /// Parent directories are not created implicitly; callers wanting an
    /// ancestor to be visible before any file exists under it must
    /// `mkdir` it themselves.
    pub fn write(&mut self, path: &str, content: Bytes) -> Result<(), Error> {
        log::debug!("writing {} bytes to `{}`", content.len(), path);
        let key = self.as_key(path)?;
        self.store.put(&key, content)?;
        Ok(())
    }

    /// Delete `path`.
    ///
    /// A file deletes its single key. A directory deletes every key below
    /// it, marker included, one request at a time; a mid-sequence failure
    /// leaves the remainder in place and surfaces to the caller. A path
    /// that is neither is a no-op.
    pub fn rm(&mut self, path: &str) -> Result<(), Error> {
        log::debug!("deleting `{}`", path);
        if self.isfile(path)? {
            let key = self.as_key(path)?;
            self.store.delete(&key)?;
        } else if self.isdir(path)? {
            let dir = Path::parse(path)?;
            let prefix = self.keys.dir_prefix(&dir);
            for key in self.store.list_prefix(&prefix)? {
                self.store.delete(&key)?;
            }
        }
        Ok(())
    }

    /// Copy `old` to `new`, leaving the source in place.
    ///
    /// A directory is copied by enumerating every key below it and
    /// rewriting the leading path segments `old` to `new`; descendants
    /// whose names merely contain `old` as a substring elsewhere are
    /// unaffected. A file goes through the copy strategy selected at
    /// construction. A source that is neither is a no-op. No atomicity
    /// across keys.
    pub fn cp(&mut self, old: &str, new: &str) -> Result<(), Error> {
        log::debug!("copying `{}` to `{}`", old, new);
        if self.isdir(old)? {
            let old_dir = Path::parse(old)?;
            let new_dir = Path::parse(new)?;
            let prefix = self.keys.dir_prefix(&old_dir);
            for key in self.store.list_prefix(&prefix)? {
                let item = self.keys.as_path(&key)?;
                let rel = match item.strip_prefix(&old_dir) {
                    Some(rel) => rel,
                    // Listing guarantees the prefix; skip anything odd.
                    None => continue,
                };
                let new_key = self.keys.as_key(&new_dir.join(&rel));
                self.copy_key(&key, &new_key)?;
            }
        } else if self.isfile(old)? {
            let old_key = self.as_key(old)?;
            let new_key = self.as_key(new)?;
            self.copy_key(&old_key, &new_key)?;
        }
        Ok(())
    }

    /// Move `old` to `new`: copy, then delete the source.
    ///
    /// Inherits the partial-failure semantics of both halves: an error
    /// during the copy leaves the source untouched; an error during the
    /// delete leaves both trees present.
    pub fn mv(&mut self, old: &str, new: &str) -> Result<(), Error> {
        log::debug!("moving `{}` to `{}`", old, new);
        self.cp(old, new)?;
        self.rm(old)
    }

    /// Immediate children of directory `path`, sorted and deduplicated.
    ///
    /// Directory-marker entries are dropped; a subdirectory shows up once
    /// no matter how many keys live below it. A path with nothing under
    /// it lists empty.
    pub fn listdir(&mut self, path: &str) -> Result<Vec<Path>, Error> {
        log::debug!("listing `{}`", path);
        let dir = Path::parse(path)?;
        let prefix = self.keys.dir_prefix(&dir);
        let mut children = BTreeSet::new();
        for key in self.store.list_prefix(&prefix)? {
            let item = self.keys.as_path(&key)?;
            let rel = match item.strip_prefix(&dir) {
                Some(rel) => rel,
                None => continue,
            };
            let first = match rel.first() {
                Some(first) => first,
                None => continue,
            };
            if rel.len() == 1 && first == self.dir_marker {
                continue;
            }
            children.insert(dir.child(first)?);
        }
        Ok(children.into_iter().collect())
    }

    /// Raw backend keys below directory `path`.
    ///
    /// Exposed for hosts that walk storage directly; order is whatever
    /// the backend's prefix scan yields.
    pub fn keys_under(&mut self, path: &str) -> Result<Vec<String>, Error> {
        let dir = Path::parse(path)?;
        let prefix = self.keys.dir_prefix(&dir);
        Ok(self.store.list_prefix(&prefix)?)
    }

    fn marker_key(&self, dir: &Path) -> Result<String, PathError> {
        Ok(self.keys.as_key(&dir.child(&self.dir_marker)?))
    }

    fn copy_key(&mut self, src: &str, dst: &str) -> Result<(), Error> {
        match self.copy {
            CopyStrategy::Native => Ok(self.store.copy(src, dst)?),
            CopyStrategy::ReadThenWrite => match self.store.get(src)? {
                Some(data) => Ok(self.store.put(dst, data)?),
                None => Err(Error::NoSuchFile {
                    path: self
                        .keys
                        .as_path(src)
                        .map(|p| p.to_string())
                        .unwrap_or_else(|_| src.to_string()),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use flatfs_kv_store::{KvError, KvRead, KvWrite};

    /// Ordered in-memory store without native copy, so these tests
    /// exercise the read-then-write strategy.
    #[derive(Default)]
    struct TestStore {
        data: BTreeMap<String, Bytes>,
    }

    impl KvRead for TestStore {
        fn get(&mut self, key: &str) -> Result<Option<Bytes>, KvError> {
            Ok(self.data.get(key).cloned())
        }

        fn exists(&mut self, key: &str) -> Result<bool, KvError> {
            Ok(self.data.contains_key(key))
        }

        fn list_prefix(&mut self, prefix: &str) -> Result<Vec<String>, KvError> {
            Ok(self
                .data
                .range(prefix.to_string()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, _)| k.clone())
                .collect())
        }
    }

    impl KvWrite for TestStore {
        fn put(&mut self, key: &str, data: Bytes) -> Result<(), KvError> {
            self.data.insert(key.to_string(), data);
            Ok(())
        }

        fn delete(&mut self, key: &str) -> Result<(), KvError> {
            self.data.remove(key);
            Ok(())
        }
    }

    fn fs() -> KvFs<TestStore> {
        KvFs::new(TestStore::default(), KvFsConfig::default()).unwrap()
    }

    fn fs_with_prefix(prefix: &str) -> KvFs<TestStore> {
        KvFs::new(
            TestStore::default(),
            KvFsConfig {
                prefix: prefix.to_string(),
                ..KvFsConfig::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn key_path_roundtrip() {
        let fs = fs_with_prefix("jupyter");
        for path in ["", "notes", "notes/x.txt", "My Notes/draft v2.ipynb"] {
            let key = fs.as_key(path).unwrap();
            assert_eq!(fs.as_path(&key).unwrap().to_string(), path);
        }
    }

    #[test]
    fn write_then_read() {
        let mut fs = fs();
        fs.write("notes/x.txt", Bytes::from_static(b"hi")).unwrap();

        assert!(fs.isfile("notes/x.txt").unwrap());
        assert_eq!(fs.read("notes/x.txt").unwrap(), Bytes::from_static(b"hi"));
    }

    #[test]
    fn read_missing_file_fails() {
        let mut fs = fs();
        assert!(matches!(
            fs.read("nope.txt"),
            Err(Error::NoSuchFile { path }) if path == "nope.txt"
        ));
    }

    #[test]
    fn invalid_path_is_rejected_up_front() {
        let mut fs = fs();
        assert!(matches!(fs.read("a/../b"), Err(Error::Path(_))));
        assert!(matches!(
            fs.write("..", Bytes::new()),
            Err(Error::Path(_))
        ));
    }

    #[test]
    fn mkdir_then_isdir() {
        let mut fs = fs();
        fs.mkdir("notes").unwrap();

        assert!(fs.isdir("notes").unwrap());
        assert!(!fs.isfile("notes").unwrap());
    }

    #[test]
    fn mkdir_is_idempotent() {
        let mut fs = fs();
        fs.mkdir("notes").unwrap();
        let once = fs.store().data.clone();

        fs.mkdir("notes").unwrap();
        assert_eq!(fs.store().data, once);
    }

    #[test]
    fn root_is_always_a_directory() {
        let mut fs = fs();
        assert!(fs.isdir("").unwrap());
        assert!(!fs.isfile("").unwrap());
    }

    #[test]
    fn writing_under_a_path_makes_it_a_directory() {
        let mut fs = fs();
        fs.write("notes/x.txt", Bytes::from_static(b"hi")).unwrap();

        // No marker was ever written, the contained key is enough.
        assert!(fs.isdir("notes").unwrap());
        assert!(!fs.isdir("notes/x.txt/deeper").unwrap());
    }

    #[test]
    fn sibling_name_prefix_is_not_a_directory_match() {
        let mut fs = fs();
        fs.write("notebook/x", Bytes::new()).unwrap();

        // `note` is a string prefix of `notebook` but not a directory.
        assert!(!fs.isdir("note").unwrap());
    }

    #[test]
    fn rm_file() {
        let mut fs = fs();
        fs.write("a.txt", Bytes::from_static(b"1")).unwrap();
        fs.rm("a.txt").unwrap();

        assert!(!fs.isfile("a.txt").unwrap());
        assert!(matches!(fs.read("a.txt"), Err(Error::NoSuchFile { .. })));
    }

    #[test]
    fn rm_directory_removes_everything_below() {
        let mut fs = fs();
        fs.mkdir("notes").unwrap();
        fs.write("notes/x.txt", Bytes::from_static(b"hi")).unwrap();
        fs.write("notes/sub/y.txt", Bytes::from_static(b"yo"))
            .unwrap();

        fs.rm("notes").unwrap();

        assert!(!fs.isdir("notes").unwrap());
        assert!(!fs.isfile("notes/x.txt").unwrap());
        assert!(!fs.isfile("notes/sub/y.txt").unwrap());
        assert!(fs.store().data.is_empty());
    }

    #[test]
    fn rm_missing_path_is_a_noop() {
        let mut fs = fs();
        fs.write("keep.txt", Bytes::new()).unwrap();
        fs.rm("ghost").unwrap();
        assert!(fs.isfile("keep.txt").unwrap());
    }

    #[test]
    fn cp_file_copies_not_moves() {
        let mut fs = fs();
        fs.write("a.txt", Bytes::from_static(b"content")).unwrap();
        fs.cp("a.txt", "b.txt").unwrap();

        assert_eq!(fs.read("a.txt").unwrap(), Bytes::from_static(b"content"));
        assert_eq!(fs.read("b.txt").unwrap(), Bytes::from_static(b"content"));
    }

    #[test]
    fn cp_directory_copies_tree() {
        let mut fs = fs();
        fs.write("d/a.txt", Bytes::from_static(b"C")).unwrap();
        fs.mkdir("d/empty").unwrap();

        fs.cp("d", "d2").unwrap();

        assert_eq!(fs.read("d2/a.txt").unwrap(), Bytes::from_static(b"C"));
        assert_eq!(fs.read("d/a.txt").unwrap(), Bytes::from_static(b"C"));
        // Marker keys travel with the tree, so empty subdirectories
        // survive the copy.
        assert!(fs.isdir("d2/empty").unwrap());
    }

    #[test]
    fn cp_rewrites_leading_segments_only() {
        let mut fs = fs();
        // The directory's own name reappears deeper in the tree.
        fs.write("a/a/x", Bytes::from_static(b"deep")).unwrap();

        fs.cp("a", "a2").unwrap();
        assert_eq!(fs.read("a2/a/x").unwrap(), Bytes::from_static(b"deep"));

        // A destination containing the source name must not disturb the
        // rewrite either.
        fs.cp("a", "b/a").unwrap();
        assert_eq!(fs.read("b/a/a/x").unwrap(), Bytes::from_static(b"deep"));
    }

    #[test]
    fn cp_missing_source_is_a_noop() {
        let mut fs = fs();
        fs.cp("ghost", "copy").unwrap();
        assert!(fs.store().data.is_empty());
    }

    #[test]
    fn mv_moves() {
        let mut fs = fs();
        fs.write("d/a.txt", Bytes::from_static(b"C")).unwrap();

        fs.mv("d", "e").unwrap();

        assert_eq!(fs.read("e/a.txt").unwrap(), Bytes::from_static(b"C"));
        assert!(!fs.isdir("d").unwrap());
        assert!(matches!(fs.read("d/a.txt"), Err(Error::NoSuchFile { .. })));
    }

    #[test]
    fn scenario_notes_lifecycle() {
        let mut fs = fs();

        fs.mkdir("notes").unwrap();
        assert!(fs.isdir("notes").unwrap());
        assert!(!fs.isfile("notes").unwrap());

        fs.write("notes/x.txt", Bytes::from_static(b"hi")).unwrap();
        assert_eq!(fs.read("notes/x.txt").unwrap(), Bytes::from_static(b"hi"));
        assert!(fs.isdir("notes").unwrap());

        fs.rm("notes").unwrap();
        assert!(!fs.isdir("notes").unwrap());
        assert!(!fs.isfile("notes/x.txt").unwrap());
    }

    #[test]
    fn prefix_scopes_all_keys() {
        let mut fs = fs_with_prefix("team/alice");

        // Construction wrote the root marker under the prefix.
        assert!(fs.store().data.contains_key("team/alice/.kvkeep"));

        fs.write("notes/x.txt", Bytes::from_static(b"hi")).unwrap();
        assert!(fs.store().data.contains_key("team/alice/notes/x.txt"));
        assert!(fs.isdir("notes").unwrap());
        assert!(fs.isfile("notes/x.txt").unwrap());

        // Keys outside the prefix do not map back to paths.
        assert!(fs.as_path("team/bob/notes/x.txt").is_err());
    }

    #[test]
    fn listdir_returns_immediate_children() {
        let mut fs = fs();
        fs.mkdir("notes").unwrap();
        fs.write("notes/a.txt", Bytes::new()).unwrap();
        fs.write("notes/sub/b.txt", Bytes::new()).unwrap();
        fs.write("notes/sub/deep/c.txt", Bytes::new()).unwrap();
        fs.write("other.txt", Bytes::new()).unwrap();

        let children: Vec<String> = fs
            .listdir("notes")
            .unwrap()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(children, vec!["notes/a.txt", "notes/sub"]);

        let root: Vec<String> = fs
            .listdir("")
            .unwrap()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(root, vec!["notes", "other.txt"]);
    }

    #[test]
    fn keys_under_exposes_raw_keys() {
        let mut fs = fs_with_prefix("p");
        fs.write("d/a", Bytes::new()).unwrap();
        fs.write("d/b", Bytes::new()).unwrap();

        assert_eq!(fs.keys_under("d").unwrap(), vec!["p/d/a", "p/d/b"]);
    }

    #[test]
    fn marker_must_be_single_segment() {
        let bad = KvFsConfig {
            dir_marker: "a/b".to_string(),
            ..KvFsConfig::default()
        };
        assert!(matches!(
            KvFs::new(TestStore::default(), bad),
            Err(Error::Path(_))
        ));

        let empty = KvFsConfig {
            dir_marker: String::new(),
            ..KvFsConfig::default()
        };
        assert!(matches!(
            KvFs::new(TestStore::default(), empty),
            Err(Error::Path(_))
        ));
    }

    #[test]
    fn into_store_returns_backend() {
        let mut fs = fs();
        fs.write("a", Bytes::from_static(b"1")).unwrap();
        let store = fs.into_store();
        assert_eq!(store.data.len(), 1);
    }
}
