//! File-backed key-value storage bound to one configuration scope.
//!
//! The backing file is a plain TOML document whose root table holds one entry
//! per stored key:
//!
//! ```toml
//! api-token = "0123456789abcdef"
//! default-language = "python"
//! recent-projects = ["alpha", "beta"]
//!
//! [ports]
//! jupyter = 8888
//! ```
//!
//! # Lifecycle
//!
//! The file is read once by [`Storage::open`].  A missing file is treated as an
//! empty mapping and is only created by the first mutation.  Every mutation
//! rewrites the whole file before returning, so nothing is ever buffered in
//! memory only.
//!
//! # Concurrency
//!
//! A `Storage` assumes it is the only writer of its file.  Two processes
//! writing the same file will silently overwrite each other's changes; callers
//! that need protection must take a file lock before opening the storage.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use toml::{Table, Value};
use tracing::{debug, trace};

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key has no stored value and the caller supplied no default.
    #[error("no value stored for key '{key}'")]
    NotFound { key: String },

    /// The backing file exists but is not a valid TOML table.
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A file system I/O error occurred.
    #[error("I/O error accessing storage at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored value cannot be read as the requested type.
    #[error("value stored for key '{key}' has a different type: {source}")]
    TypeMismatch {
        key: String,
        #[source]
        source: toml::de::Error,
    },

    /// The value cannot be represented in the storage format.
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Persistent string-keyed mapping backed by a single TOML file.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
    data: Table,
}

impl Storage {
    /// Opens the storage at `path`, loading its current contents.
    ///
    /// The file does not need to exist, and neither does its directory.  A path
    /// that cannot hold a file at all (an ancestor is a regular file, say) also
    /// opens as an empty mapping; the problem is reported by the first write.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] if the file exists but cannot be
    /// parsed, and [`StorageError::Io`] if it exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let data = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<Table>(&content).map_err(|source| {
                StorageError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Table::new(),
            // ENOTDIR and friends: nothing can be stored there yet.
            Err(e) if !path.exists() => {
                trace!(path = %path.display(), error = %e, "storage path unreachable");
                Table::new()
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        debug!(path = %path.display(), keys = data.len(), "opened storage");
        Ok(Self { path, data })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the stored keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Returns the raw value stored under `key`, if any.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Reads the value stored under `key` as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if nothing is stored under `key`,
    /// and [`StorageError::TypeMismatch`] if the stored value is of another
    /// kind (a string is never read back as a number, for instance).
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, StorageError> {
        trace!(key, "storage lookup");
        match self.data.get(key) {
            Some(value) => decode(key, value),
            None => Err(StorageError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Reads the value stored under `key` as `T`, falling back to `default`
    /// when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TypeMismatch`] if a value is stored but is of
    /// another kind.  The default is only used for missing keys.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, StorageError> {
        match self.data.get(key) {
            Some(value) => decode(key, value),
            None => Ok(default),
        }
    }

    /// Stores `value` under `key`, replacing any previous value, and writes
    /// the file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialize`] if `value` has no TOML
    /// representation (e.g. `None`), and [`StorageError::Io`] if the file or
    /// its parent directory cannot be written.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let value = Value::try_from(value)?;

        let mut next = self.data.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        self.data = next;

        debug!(key, path = %self.path.display(), "stored value");
        Ok(())
    }

    /// Removes `key`.  Deleting an absent key is not an error and leaves the
    /// file untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the updated file cannot be written.
    pub fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.data.contains_key(key) {
            return Ok(());
        }

        let mut next = self.data.clone();
        next.remove(key);
        self.persist(&next)?;
        self.data = next;

        debug!(key, path = %self.path.display(), "deleted value");
        Ok(())
    }

    /// Removes every key and deletes the backing file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be removed.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        }

        self.data.clear();
        debug!(path = %self.path.display(), "cleared storage");
        Ok(())
    }

    /// Writes `data` to the backing file, creating its directory if needed.
    fn persist(&self, data: &Table) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(data)?;
        std::fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, StorageError> {
    value
        .clone()
        .try_into()
        .map_err(|source| StorageError::TypeMismatch {
            key: key.to_string(),
            source,
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
