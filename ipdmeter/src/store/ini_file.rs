//! INI-file store.
//!
//! Values live in a single `[calibration]` section. Every mutation rewrites
//! the whole file, which is a few lines long, through a sibling temp file
//! renamed over the target. The in-memory document only changes once the
//! file is in place, so a failed write leaves both untouched.

use std::path::{Path, PathBuf};

use ::ini::Ini;
use parking_lot::Mutex;

use super::traits::{KeyValueStore, StoreError, StoreWrite};

/// Section holding every stored value.
const SECTION: &str = "calibration";

/// Key-value store persisted to an INI file.
#[derive(Debug)]
pub struct IniStore {
    path: PathBuf,
    document: Mutex<Ini>,
}

impl IniStore {
    /// Open a store at `path`.
    ///
    /// A missing file is treated as an empty store; it is created on the
    /// first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = if path.exists() {
            Ini::load_from_file(&path).map_err(|e| match e {
                ::ini::Error::Io(source) => StoreError::Read {
                    path: path.clone(),
                    source,
                },
                ::ini::Error::Parse(parse) => StoreError::Parse {
                    path: path.clone(),
                    reason: parse.to_string(),
                },
            })?
        } else {
            Ini::new()
        };

        tracing::debug!(path = %path.display(), "Opened calibration store");

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, document: &Ini) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let staging = self.staging_path();
        document
            .write_to_file(&staging)
            .map_err(|source| StoreError::Write {
                path: staging.clone(),
                source,
            })?;
        std::fs::rename(&staging, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&staging);
            StoreError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Temp file next to the target, on the same filesystem for the rename.
    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl KeyValueStore for IniStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .document
            .lock()
            .get_from(Some(SECTION), key)
            .map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.apply(&[StoreWrite::set(key, value)])
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.apply(&[StoreWrite::remove(key)])
    }

    fn apply(&self, writes: &[StoreWrite]) -> Result<(), StoreError> {
        let mut document = self.document.lock();

        let mut staged = document.clone();
        let mut changed = false;
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => {
                    staged.with_section(Some(SECTION)).set(key.as_str(), value.as_str());
                    changed = true;
                }
                StoreWrite::Remove { key } => {
                    changed |= staged.delete_from(Some(SECTION), key).is_some();
                }
            }
        }
        if !changed {
            return Ok(());
        }

        self.flush(&staged)?;
        *document = staged;
        Ok(())
    }
}
