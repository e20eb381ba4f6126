//! CLI error type.

use std::fmt;

use ipdmeter::calibration::CalibrationError;
use ipdmeter::config::ConfigError;
use ipdmeter::logging::LoggingError;
use ipdmeter::observation::RecordingError;
use ipdmeter::store::StoreError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid arguments or settings.
    Config(String),
    /// The configuration file could not be loaded or saved.
    ConfigFile(ConfigError),
    /// The calibration store failed.
    Store(StoreError),
    /// A calibration session failed.
    Calibration(CalibrationError),
    /// A recording could not be read.
    Recording(RecordingError),
    /// Logging could not be set up.
    Logging(LoggingError),
    /// Terminal or file I/O failed.
    Io(std::io::Error),
    /// A report could not be serialized.
    Json(serde_json::Error),
}

impl CliError {
    /// Print the error and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(1);
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Store(e) => write!(f, "{}", e),
            CliError::Calibration(e) => write!(f, "{}", e),
            CliError::Recording(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::Json(e) => write!(f, "Failed to encode report: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::ConfigFile(e) => Some(e),
            CliError::Store(e) => Some(e),
            CliError::Calibration(e) => Some(e),
            CliError::Recording(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Json(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<CalibrationError> for CliError {
    fn from(e: CalibrationError) -> Self {
        CliError::Calibration(e)
    }
}

impl From<RecordingError> for CliError {
    fn from(e: RecordingError) -> Self {
        CliError::Recording(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}
