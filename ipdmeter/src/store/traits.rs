//! Storage capability trait.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the backing file.
    #[error("Failed to read store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the backing file.
    #[error("Failed to write store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but could not be parsed.
    #[error("Failed to parse store {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// One change in a batch write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    /// Set `key` to `value`.
    Set { key: String, value: String },
    /// Delete `key` if present.
    Remove { key: String },
}

impl StoreWrite {
    /// Set a value.
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        StoreWrite::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Delete a value.
    pub fn remove(key: impl Into<String>) -> Self {
        StoreWrite::Remove { key: key.into() }
    }
}

/// String key-value storage.
///
/// Mirrors a browser-style storage API: values are strings, absent keys read
/// as `None`, and `remove` of an absent key is not an error.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a store can be shared between the
/// measurement loop and calibration sessions.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Apply several changes as one write.
    ///
    /// Backends that can commit atomically override this so that either every
    /// change lands or none does. The default applies them one by one.
    fn apply(&self, writes: &[StoreWrite]) -> Result<(), StoreError> {
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => self.set(key, value)?,
                StoreWrite::Remove { key } => self.remove(key)?,
            }
        }
        Ok(())
    }
}

/// Shared store handle.
pub type SharedStore = Arc<dyn KeyValueStore>;

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn apply(&self, writes: &[StoreWrite]) -> Result<(), StoreError> {
        (**self).apply(writes)
    }
}
