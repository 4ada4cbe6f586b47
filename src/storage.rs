//! Durable local storage
//!
//! The key-value contract that cart and checkout state persists through.
//! Keys are flat strings; values are opaque serialised payloads.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying store failed to read or write.
    #[error("storage io error")]
    Io(#[from] io::Error),

    /// The key contains characters the backend cannot represent.
    #[error("storage key {0:?} is not valid")]
    InvalidKey(String),
}

/// A durable string key-value store.
///
/// Absent keys read as `Ok(None)` and removing an absent key succeeds, so
/// callers never need to distinguish "never written" from "cleared".
pub trait Storage {
    /// Reads the value at `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend fails to read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend fails to write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value at `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend fails to remove.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, used in tests and as a scratch store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);

        Ok(())
    }
}

/// File-backed storage with one file per key under a root directory.
///
/// Keys map directly to file names, so they must start with an alphanumeric
/// character and contain only alphanumerics, `.`, `-` and `_`; anything else
/// is rejected rather than resolved against the filesystem.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Creates storage rooted at `root`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory backing this store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = key.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StorageError::Io(error)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.root)?;
        fs::write(path, value)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StorageError::Io(error)),
        }
    }
}
