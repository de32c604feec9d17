//! In-memory store

use std::sync::RwLock;

use rustc_hash::FxHashMap;

use super::{KeyValueStore, StorageError, StorageKey};

/// Process-local store, used by tests and when no data directory is wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<FxHashMap<StorageKey, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let values = self.values.read().map_err(|_err| StorageError::Poisoned)?;

        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_err| StorageError::Poisoned)?;

        values.insert(key, value.to_string());

        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_err| StorageError::Poisoned)?;

        values.remove(&key);

        Ok(())
    }
}
