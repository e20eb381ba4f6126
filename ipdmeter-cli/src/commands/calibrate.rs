//! Calibrate command - solve a calibration constant from a recording.

use std::path::PathBuf;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use ipdmeter::calibration::{
    CalibrationError, CalibrationKind, CalibrationResult, ManualClock, ReplaySource, TokioClock,
};
use tokio_util::sync::CancellationToken;

use super::common::{load_recording, GlobalArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the calibrate command.
pub struct CalibrateArgs {
    pub kind: CalibrationKind,
    pub recording: PathBuf,
    pub fast: bool,
    pub loop_recording: bool,
}

/// Run the calibrate command.
pub fn run(global: &GlobalArgs, args: CalibrateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("calibrate");

    let mut meter = runner.create_meter()?;
    let frames = load_recording(&args.recording)?;
    let mut source = ReplaySource::new(frames).looping(args.loop_recording);

    let kind = args.kind;
    let budget = meter.config().calibration().budget(kind);
    let reference_cm = meter.config().reference_distance_cm;

    // Ctrl+C aborts the session without touching the stored calibration
    let abort = CancellationToken::new();
    let handler_token = abort.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    println!(
        "Calibrating {} at {:.0} cm ({} ms, up to {} samples)",
        kind.description(),
        reference_cm,
        budget.time_budget.as_millis(),
        budget.max_samples
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let spinner = (!args.fast).then(|| session_spinner(kind));
    let result = runtime.block_on(async {
        if args.fast {
            meter
                .calibrate(kind, &mut source, &ManualClock::new(), &abort)
                .await
        } else {
            meter.calibrate(kind, &mut source, &TokioClock, &abort).await
        }
    });
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(result) => {
            print_result(&result);
            println!("Saved to {}", runner.state_file().display());
            Ok(())
        }
        Err(e) => {
            print_hint(&e);
            Err(e.into())
        }
    }
}

fn session_spinner(kind: CalibrationKind) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        spinner.set_style(template);
    }
    spinner.set_message(format!("Sampling {}...", kind.description()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_result(result: &CalibrationResult) {
    let value = match result.kind {
        CalibrationKind::Focal => format!("f_px = {:.1} px", result.value),
        CalibrationKind::Iris => format!("iris = {:.3} cm", result.value),
    };
    println!(
        "{} {} (median iris {:.2} px over {} samples)",
        style("✓").green(),
        style(value).bold(),
        result.median_diameter_px,
        result.sample_count
    );
}

fn print_hint(error: &CalibrationError) {
    let hint = match error {
        CalibrationError::FocalLengthRequired => {
            "Run 'ipdmeter calibrate focal <recording>' first."
        }
        CalibrationError::InsufficientSamples { .. } => {
            "Too few frames with both eyes facing the camera. Look straight at the lens and retry."
        }
        CalibrationError::Aborted { .. } => "Stored calibration was left unchanged.",
        CalibrationError::InvalidSolution { .. } | CalibrationError::Store(_) => return,
    };
    eprintln!("{} {}", style("!").yellow(), hint);
}
