//! File-backed store

use std::{fs, io, path::PathBuf};

use super::{KeyValueStore, StorageError, StorageKey};

/// One JSON file per key under a data directory.
///
/// Writes go to a temporary file that is then renamed over the target, so readers never see a
/// partial document.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}
