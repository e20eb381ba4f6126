//! Init command - initialize configuration file.

use ipdmeter::config::ConfigFile;

use super::common::GlobalArgs;
use crate::error::CliError;

/// Run the init command.
pub fn run(global: &GlobalArgs) -> Result<(), CliError> {
    let path = global.config_path();

    // Keep existing settings; fill in anything missing
    let config = ConfigFile::load_from(&path)?;
    config.save_to(&path)?;

    println!("Configuration file: {}", path.display());
    println!("Calibration state:  {}", config.state_file().display());
    println!();
    println!("Edit this file to customize IPD Meter settings.");
    println!("Then record a session and run 'ipdmeter calibrate focal <recording>'.");
    Ok(())
}
