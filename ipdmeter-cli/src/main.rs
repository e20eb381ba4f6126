//! IPD Meter CLI - Command-line interface
//!
//! Measures interpupillary distance from recorded facial landmark streams
//! and manages camera calibration.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::calibrate::CalibrateArgs;
use commands::common::{CalibrationKindArg, GlobalArgs};
use commands::config::ConfigCommands;
use commands::run::RunArgs;

#[derive(Debug, Parser)]
#[command(name = "ipdmeter", version, about = "Interpupillary distance from facial landmarks")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the configuration file with default settings
    Init,

    /// Measure IPD from a landmark recording (JSON Lines)
    Run {
        /// Recording file, one frame per line
        recording: PathBuf,

        /// Assume the subject is at the reference distance
        #[arg(long)]
        fixed_distance: bool,

        /// Print one JSON report per frame
        #[arg(long)]
        json: bool,

        /// Print only the summary
        #[arg(long, short)]
        quiet: bool,
    },

    /// Run a calibration session against a landmark recording
    Calibrate {
        /// Which constant to solve for
        #[arg(value_enum)]
        kind: CalibrationKindArg,

        /// Recording of the subject holding still at the reference distance
        recording: PathBuf,

        /// Replay on virtual time instead of real time
        #[arg(long)]
        fast: bool,

        /// Restart the recording when it runs out
        #[arg(long = "loop")]
        loop_recording: bool,
    },

    /// Show the stored calibration
    Status,

    /// Clear the stored calibration
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::run(&cli.global),
        Commands::Run {
            recording,
            fixed_distance,
            json,
            quiet,
        } => commands::run::run(
            &cli.global,
            RunArgs {
                recording,
                fixed_distance,
                json,
                quiet,
            },
        ),
        Commands::Calibrate {
            kind,
            recording,
            fast,
            loop_recording,
        } => commands::calibrate::run(
            &cli.global,
            CalibrateArgs {
                kind: kind.into(),
                recording,
                fast,
                loop_recording,
            },
        ),
        Commands::Status => commands::status::run(&cli.global),
        Commands::Reset { yes } => commands::reset::run(&cli.global, yes),
        Commands::Config { command } => commands::config::run(&cli.global, command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
