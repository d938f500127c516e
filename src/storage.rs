//! Storage
//!
//! Durable string key-value stores used to keep the cart across restarts.

use std::{
    collections::HashMap,
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Errors raised by a [`CartStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("storage I/O error")]
    Io(#[from] io::Error),

    /// The stored value could not be encoded or decoded.
    #[error("stored value is not valid cart JSON")]
    Json(#[from] serde_json::Error),
}

/// A durable string key-value store.
pub trait CartStorage: Debug + Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store values under `dir`, which is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored values.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        // Write-then-rename so a crash never leaves a truncated cart behind.
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn memory_storage_round_trips_values() -> TestResult {
        let mut storage = MemoryStorage::new();

        assert_eq!(storage.read("cart")?, None);

        storage.write("cart", "[]")?;

        assert_eq!(storage.read("cart")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn file_storage_missing_key_reads_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.read("cart")?, None);

        Ok(())
    }

    #[test]
    fn file_storage_creates_directory_and_overwrites() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::new(dir.path().join("nested"));

        storage.write("cart", r#"[{"id":"a"}]"#)?;
        storage.write("cart", "[]")?;

        assert_eq!(storage.read("cart")?.as_deref(), Some("[]"));
        assert!(storage.dir().join("cart.json").exists());
        assert!(!storage.dir().join("cart.json.tmp").exists());

        Ok(())
    }
}
