//! Key-value persistence for calibration constants.
//!
//! The measurement pipeline never talks to a concrete storage backend. It is
//! handed a [`KeyValueStore`] and reads/writes a handful of named scalars
//! through it.
//!
//! # Available Stores
//!
//! - [`MemoryStore`]: process-local map, for tests and ephemeral sessions
//! - [`IniStore`]: INI file on disk, rewritten atomically on every change
//!
//! # Example
//!
//! ```
//! use ipdmeter::store::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("ipd_fpx", "512.5").unwrap();
//! assert_eq!(store.get("ipd_fpx").unwrap().as_deref(), Some("512.5"));
//!
//! store.remove("ipd_fpx").unwrap();
//! assert!(store.get("ipd_fpx").unwrap().is_none());
//! ```

mod ini_file;
mod memory;
mod traits;

pub use ini_file::IniStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, SharedStore, StoreError, StoreWrite};
