//! Shared setup for commands that run the measurement pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use ipdmeter::config::ConfigFile;
use ipdmeter::logging::{init_logging, WorkerGuard};
use ipdmeter::store::IniStore;
use ipdmeter::IpdMeter;

use crate::commands::common::GlobalArgs;
use crate::error::CliError;

/// Loads configuration, installs logging and opens the calibration store.
pub struct CliRunner {
    config: ConfigFile,
    config_path: PathBuf,
    state_file: PathBuf,
    /// Flushes the log file on drop.
    _log_guard: Option<WorkerGuard>,
}

impl CliRunner {
    /// Load configuration and install logging.
    pub fn new(global: &GlobalArgs) -> Result<Self, CliError> {
        let config_path = global.config_path();
        let config = ConfigFile::load_from(&config_path)?;
        let log_guard = init_logging(&config.to_logging_config())?;

        let state_file = global
            .state
            .clone()
            .unwrap_or_else(|| config.state_file());

        Ok(Self {
            config,
            config_path,
            state_file,
            _log_guard: log_guard,
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Calibration state file in use.
    pub fn state_file(&self) -> &PathBuf {
        &self.state_file
    }

    /// Log the command being run with its file locations.
    pub fn log_startup(&self, command: &str) {
        tracing::info!(
            version = ipdmeter::VERSION,
            command = command,
            config = %self.config_path.display(),
            state = %self.state_file.display(),
            "ipdmeter starting"
        );
    }

    /// Open the calibration store.
    pub fn open_store(&self) -> Result<Arc<IniStore>, CliError> {
        Ok(Arc::new(IniStore::open(&self.state_file)?))
    }

    /// Build a meter backed by the calibration store.
    pub fn create_meter(&self) -> Result<IpdMeter, CliError> {
        let store = self.open_store()?;
        Ok(IpdMeter::new(self.config.to_meter_config(), store)?)
    }
}
