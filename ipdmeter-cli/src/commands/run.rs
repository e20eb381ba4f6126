//! Run command - measure IPD from a landmark recording.

use std::path::PathBuf;

use ipdmeter::{MeasurementReport, MeasurementWarning};

use super::common::{format_optional, load_recording, GlobalArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
pub struct RunArgs {
    pub recording: PathBuf,
    pub fixed_distance: bool,
    pub json: bool,
    pub quiet: bool,
}

/// Warning counts over a run.
#[derive(Debug, Default)]
struct WarningTally {
    no_face: usize,
    off_axis: usize,
    outlier: usize,
}

impl WarningTally {
    fn record(&mut self, warning: Option<MeasurementWarning>) {
        match warning {
            Some(MeasurementWarning::NoFace) => self.no_face += 1,
            Some(MeasurementWarning::OffAxisGaze) => self.off_axis += 1,
            Some(MeasurementWarning::Outlier) => self.outlier += 1,
            None => {}
        }
    }
}

/// Run the run command.
pub fn run(global: &GlobalArgs, args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("run");

    let mut meter = runner.create_meter()?;
    if args.fixed_distance {
        meter.set_fixed_distance(true);
    }

    let frames = load_recording(&args.recording)?;

    let mut tally = WarningTally::default();
    let mut last: Option<MeasurementReport> = None;

    for (index, frame) in frames.iter().enumerate() {
        let report = meter.process_frame(frame.as_ref());
        tally.record(report.warning);

        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else if !args.quiet {
            println!("{:>6}  {}", index + 1, report);
        }
        last = Some(report);
    }

    if args.json {
        return Ok(());
    }

    let constants = meter.constants();
    println!();
    println!("Run Summary");
    println!("───────────");
    println!("  Frames:        {}", frames.len());
    println!(
        "  Warnings:      {} no face, {} off-axis, {} outliers",
        tally.no_face, tally.off_axis, tally.outlier
    );
    if let Some(report) = last {
        println!(
            "  Distance:      {} ({})",
            format_optional(report.distance_cm, 1, "cm"),
            report.distance_mode
        );
        println!("  IPD:           {}", format_optional(report.ipd_cm, 2, "cm"));
        println!("  IPD (pixels):  {}", format_optional(report.ipd_px, 1, "px"));
    }
    println!("  Processing:    {:.0} frames/s", meter.frame_rate().fps());

    if !constants.is_calibrated() && !meter.uses_fixed_distance() {
        println!();
        println!("Camera not calibrated. Run 'ipdmeter calibrate focal <recording>' first,");
        println!("or pass --fixed-distance to assume the reference distance.");
    }

    Ok(())
}
