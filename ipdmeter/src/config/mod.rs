//! Configuration file support.
//!
//! Settings live in `<config_dir>/ipdmeter/config.ini`:
//!
//! ```ini
//! [measurement]
//! fixed_distance_cm = 30
//! use_fixed_distance = false
//! default_iris_cm = 1.17
//! gate_ratio = 1.15
//! ipd_offset_cm = 0.6
//! fit_tolerance_px = 0.001
//!
//! [stream]
//! window = 21
//! k = 3.5
//!
//! [calibration]
//! focal_budget_ms = 3000
//! focal_max_samples = 20
//! iris_budget_ms = 2000
//! iris_max_samples = 20
//! min_samples = 10
//! poll_interval_ms = 30
//!
//! [storage]
//! state_file = /path/to/calibration.ini
//!
//! [logging]
//! level = info
//! file = /path/to/ipdmeter.log
//! ```
//!
//! Missing keys take their defaults.

mod error;
mod file;
mod keys;

pub use error::ConfigError;
pub use file::{
    config_directory, config_file_path, CalibrationSettings, ConfigFile, LoggingSettings,
    MeasurementSettings, StorageSettings, StreamSettings,
};
pub use keys::ConfigKey;
