//! Object storage collaborators.
//!
//! The engine reads fragment bytes through [`FetchSource`] and hands finished
//! mixes to a [`PersistSink`]. Keys are slash-separated relative paths such as
//! `recordings/segment-7/abc.wav`.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Storage collaborator error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0:?}")]
    InvalidKey(String),

    #[error("I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Any other backend failure.
    #[error("Storage backend: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Reads raw object bytes by key.
pub trait FetchSource: Send + Sync {
    fn fetch(&self, key: &str) -> StoreResult<Vec<u8>>;
}

/// Accepts encoded bytes under a key.
pub trait PersistSink: Send + Sync {
    fn persist(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;

    fn contains(&self, key: &str) -> StoreResult<bool>;
}

/// Reject empty, absolute and parent-escaping keys.
pub fn validate_key(key: &str) -> StoreResult<()> {
    let path = Path::new(key);
    let valid = !key.is_empty()
        && !key.ends_with('/')
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Process-local store, used by tests and by callers that already hold the bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, bytes: Vec<u8>) {
        self.objects.write().insert(key.into(), bytes);
    }

    pub fn remove(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl FetchSource for MemoryStore {
    fn fetch(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}

impl PersistSink for MemoryStore {
    fn persist(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        validate_key(key)?;
        self.insert(key, bytes.to_vec());
        Ok(())
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.objects.read().contains_key(key))
    }
}

/// Store rooted at a directory; keys map to relative file paths.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl FetchSource for FsStore {
    fn fetch(&self, key: &str) -> StoreResult<Vec<u8>> {
        let path = self.path_for(key)?;
        fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(key.to_string()),
            _ => StoreError::Io {
                key: key.to_string(),
                source,
            },
        })
    }
}

impl PersistSink for FsStore {
    /// Writes to a sibling temp file and renames it into place.
    fn persist(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let io_err = |source: io::Error| StoreError::Io {
            key: key.to_string(),
            source,
        };

        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent).map_err(io_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(bytes).map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        tracing::debug!(key, bytes = bytes.len(), "persisted object");
        Ok(())
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.path_for(key)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("mixes/abc.wav").is_ok());
        assert!(validate_key("a").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("mixes/../../x").is_err());
        assert!(validate_key("./x").is_err());
        assert!(validate_key("mixes/").is_err());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.fetch("missing").unwrap_err().is_not_found());

        store.persist("mixes/a.wav", b"abc").unwrap();
        assert_eq!(store.fetch("mixes/a.wav").unwrap(), b"abc");
        assert!(store.contains("mixes/a.wav").unwrap());
        assert!(!store.contains("mixes/b.wav").unwrap());
        assert_eq!(store.keys(), vec!["mixes/a.wav".to_string()]);

        assert!(matches!(
            store.persist("../a", b"x"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_fs_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());

        assert!(store.fetch("recordings/x.wav").unwrap_err().is_not_found());
        assert!(!store.contains("recordings/x.wav").unwrap());

        store.persist("recordings/segment-1/x.wav", b"RIFF").unwrap();
        assert!(dir.path().join("recordings/segment-1/x.wav").is_file());
        assert_eq!(store.fetch("recordings/segment-1/x.wav").unwrap(), b"RIFF");
        assert!(store.contains("recordings/segment-1/x.wav").unwrap());

        // Overwrite in place
        store.persist("recordings/segment-1/x.wav", b"RIFF2").unwrap();
        assert_eq!(store.fetch("recordings/segment-1/x.wav").unwrap(), b"RIFF2");
    }

    #[test]
    fn test_fs_store_rejects_escape() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        assert!(matches!(
            store.fetch("../outside"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(store.persist("/abs", b"x").is_err());
    }
}
