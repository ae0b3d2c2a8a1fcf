//! JSON-file-backed key-value store
//!
//! Each key is stored as `<key>.json` inside the store directory. Values are
//! serialized with serde, so any `Serialize`/`DeserializeOwned` type can be
//! saved and loaded. Missing keys are not errors; they load as `None`.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem read/write failed
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be serialized or deserialized
    #[error("store serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    /// Key contains characters that are not filesystem-safe
    #[error("invalid store key: '{0}'")]
    InvalidKey(String),
}

/// Persistent key-value store backed by one JSON file per key
///
/// The store lives in an XDG-compliant data directory
/// (`~/.local/share/localboard/` on Linux). Keys are restricted to
/// `[A-Za-z0-9._-]` so they map safely onto file names.
#[derive(Debug, Clone)]
pub struct KvStore {
    /// Directory where value files are stored
    dir: PathBuf,
}

impl KvStore {
    /// Creates a store in the platform data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home
    /// directory in a stripped-down container).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "localboard")?;
        Some(Self {
            dir: project_dirs.data_dir().to_path_buf(),
        })
    }

    /// Creates a store rooted at a custom directory
    ///
    /// Useful for testing or when a specific location is needed.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the file path backing the given key
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Saves a value under the given key, creating the directory if needed
    ///
    /// # Arguments
    /// * `key` - Namespaced identifier, e.g. `"theme"` or `"cache_3f9a..."`
    /// * `value` - Any serializable value; overwrites an existing entry
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(value)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads the value stored under the given key
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the key exists and parses
    /// * `Ok(None)` if the key does not exist
    /// * `Err(StoreError)` on I/O or parse failure
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Removes the value stored under the given key, if any
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes every entry in the store
    ///
    /// This is the only way cache entries are ever deleted in bulk; individual
    /// entries are otherwise overwritten in place or ignored once expired.
    pub fn clear(&self) -> Result<(), StoreError> {
        if !self.dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.path().extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}
