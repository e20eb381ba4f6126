//! Reset command - clear the stored calibration.

use dialoguer::Confirm;

use super::common::GlobalArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the reset command.
pub fn run(global: &GlobalArgs, skip_confirm: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("reset");

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Clear the focal length and restore the default iris size?")
            .default(false)
            .interact()
            .map_err(|e| CliError::Config(format!("Confirmation failed: {}", e)))?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let mut meter = runner.create_meter()?;
    meter.reset()?;

    println!(
        "Calibration reset (iris {:.2} cm, focal length cleared).",
        meter.constants().iris_cm
    );
    Ok(())
}
