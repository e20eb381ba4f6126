//! INI configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;

use super::error::ConfigError;
use super::keys::ConfigKey;
use crate::calibration::{SessionBudget, DEFAULT_IRIS_CM, DEFAULT_REFERENCE_DISTANCE_CM};
use crate::estimate::DEFAULT_IPD_OFFSET_CM;
use crate::geometry::DEFAULT_FIT_TOLERANCE_PX;
use crate::logging::LoggingConfig;
use crate::observation::DEFAULT_GATE_RATIO;
use crate::pipeline::MeterConfig;
use crate::stream::StreamConfig;

/// Application directory name under the platform config directory.
const APP_DIR: &str = "ipdmeter";

/// Configuration file name.
const CONFIG_FILE: &str = "config.ini";

/// Default calibration state file name.
const STATE_FILE: &str = "calibration.ini";

/// `[measurement]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSettings {
    /// Reference distance for calibration and fixed-distance mode (cm).
    pub fixed_distance_cm: f64,
    /// Start in fixed-distance mode.
    pub use_fixed_distance: bool,
    /// Population-average iris diameter (cm).
    pub default_iris_cm: f64,
    /// Bilateral iris gate ratio.
    pub gate_ratio: f64,
    /// Additive IPD display offset (cm).
    pub ipd_offset_cm: f64,
    /// Circle containment tolerance (pixels).
    pub fit_tolerance_px: f64,
}

impl Default for MeasurementSettings {
    fn default() -> Self {
        Self {
            fixed_distance_cm: DEFAULT_REFERENCE_DISTANCE_CM,
            use_fixed_distance: false,
            default_iris_cm: DEFAULT_IRIS_CM,
            gate_ratio: DEFAULT_GATE_RATIO,
            ipd_offset_cm: DEFAULT_IPD_OFFSET_CM,
            fit_tolerance_px: DEFAULT_FIT_TOLERANCE_PX,
        }
    }
}

/// `[stream]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSettings {
    /// Window capacity.
    pub window: usize,
    /// Outlier rejection multiplier.
    pub k: f64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        let defaults = StreamConfig::default();
        Self {
            window: defaults.window,
            k: defaults.k,
        }
    }
}

/// `[calibration]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSettings {
    pub focal_budget_ms: u64,
    pub focal_max_samples: usize,
    pub iris_budget_ms: u64,
    pub iris_max_samples: usize,
    pub min_samples: usize,
    pub poll_interval_ms: u64,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        let focal = SessionBudget::focal();
        let iris = SessionBudget::iris();
        Self {
            focal_budget_ms: focal.time_budget.as_millis() as u64,
            focal_max_samples: focal.max_samples,
            iris_budget_ms: iris.time_budget.as_millis() as u64,
            iris_max_samples: iris.max_samples,
            min_samples: focal.min_samples,
            poll_interval_ms: focal.poll_interval.as_millis() as u64,
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageSettings {
    /// Calibration state file; `None` uses the default location.
    pub state_file: Option<PathBuf>,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Default log level when `RUST_LOG` is unset.
    pub level: String,
    /// Optional log file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub measurement: MeasurementSettings,
    pub stream: StreamSettings,
    pub calibration: CalibrationSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(parse) => ConfigError::Parse {
                path: path.to_path_buf(),
                reason: parse.to_string(),
            },
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        ini.write_to_file(path).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Calibration state file, falling back to the default location.
    pub fn state_file(&self) -> PathBuf {
        self.storage
            .state_file
            .clone()
            .unwrap_or_else(|| config_directory().join(STATE_FILE))
    }

    /// Measurement pipeline configuration.
    pub fn to_meter_config(&self) -> MeterConfig {
        let m = &self.measurement;
        let c = &self.calibration;
        let poll_interval = Duration::from_millis(c.poll_interval_ms);

        MeterConfig {
            reference_distance_cm: m.fixed_distance_cm,
            use_fixed_distance: m.use_fixed_distance,
            default_iris_cm: m.default_iris_cm,
            gate_ratio: m.gate_ratio,
            ipd_offset_cm: m.ipd_offset_cm,
            fit_tolerance_px: m.fit_tolerance_px,
            stream: StreamConfig {
                window: self.stream.window,
                k: self.stream.k,
                ..StreamConfig::default()
            },
            focal: SessionBudget {
                time_budget: Duration::from_millis(c.focal_budget_ms),
                max_samples: c.focal_max_samples,
                min_samples: c.min_samples,
                poll_interval,
            },
            iris: SessionBudget {
                time_budget: Duration::from_millis(c.iris_budget_ms),
                max_samples: c.iris_max_samples,
                min_samples: c.min_samples,
                poll_interval,
            },
        }
    }

    /// Logging configuration.
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.logging.level.clone(),
            file: self.logging.file.clone(),
        }
    }
}

/// Platform configuration directory for the application.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default configuration file path.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE)
}
