//! In-memory store.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::traits::{KeyValueStore, StoreError, StoreWrite};

/// Process-local key-value store.
///
/// Nothing survives the process. Useful for tests and for running the
/// pipeline without touching the user's saved calibration.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn apply(&self, writes: &[StoreWrite]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => {
                    entries.insert(key.clone(), value.clone());
                }
                StoreWrite::Remove { key } => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}
