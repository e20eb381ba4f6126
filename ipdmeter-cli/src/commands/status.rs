//! Status command - show the stored calibration.

use console::style;

use super::common::GlobalArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the status command.
pub fn run(global: &GlobalArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    let meter = runner.create_meter()?;
    let constants = meter.constants();
    let config = meter.config();

    println!("IPD Meter v{}", ipdmeter::VERSION);
    println!("==============");
    println!();
    println!("Calibration");
    match constants.f_px {
        Some(f_px) => println!("  Focal length:   {:.1} px", f_px),
        None => println!("  Focal length:   {}", style("not calibrated").yellow()),
    }
    let iris_note = if constants.is_personalized() {
        style("personalized").green().to_string()
    } else {
        "population default".to_string()
    };
    println!("  Iris diameter:  {:.3} cm ({})", constants.iris_cm, iris_note);
    println!();
    println!("Measurement");
    println!("  Reference distance: {:.1} cm", config.reference_distance_cm);
    println!(
        "  Fixed distance:     {}",
        if config.use_fixed_distance { "on" } else { "off" }
    );
    println!("  IPD offset:         {:+.2} cm", config.ipd_offset_cm);
    println!("  Gate ratio:         {:.2}", config.gate_ratio);
    println!();
    println!("State file:  {}", runner.state_file().display());
    println!("Config file: {}", global.config_path().display());

    Ok(())
}
