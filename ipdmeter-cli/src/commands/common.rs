//! Common types and utilities shared across CLI commands.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use ipdmeter::calibration::CalibrationKind;
use ipdmeter::config::config_file_path;
use ipdmeter::observation::read_recording;
use ipdmeter::LandmarkFrame;

use crate::error::CliError;

/// Options accepted by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: <config dir>/ipdmeter/config.ini)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Calibration state file (overrides storage.state_file)
    #[arg(long, global = true, value_name = "FILE")]
    pub state: Option<PathBuf>,
}

impl GlobalArgs {
    /// Configuration file path, CLI first.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }
}

/// Calibration kind selection for CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CalibrationKindArg {
    /// Solve the camera focal length (run first)
    Focal,
    /// Solve the personal iris size (needs a focal length)
    Iris,
}

impl From<CalibrationKindArg> for CalibrationKind {
    fn from(kind: CalibrationKindArg) -> Self {
        match kind {
            CalibrationKindArg::Focal => CalibrationKind::Focal,
            CalibrationKindArg::Iris => CalibrationKind::Iris,
        }
    }
}

/// Read a JSON Lines landmark recording.
pub fn load_recording(path: &Path) -> Result<Vec<Option<LandmarkFrame>>, CliError> {
    let file = File::open(path).map_err(|e| {
        CliError::Config(format!("Cannot open recording {}: {}", path.display(), e))
    })?;
    let frames = read_recording(BufReader::new(file))?;
    if frames.is_empty() {
        return Err(CliError::Config(format!(
            "Recording {} contains no frames",
            path.display()
        )));
    }
    Ok(frames)
}

/// Format an optional value with a unit.
pub fn format_optional(value: Option<f64>, precision: usize, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.*} {}", precision, v, unit),
        None => "--".to_string(),
    }
}
