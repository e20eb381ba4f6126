//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` commands
//! for viewing and modifying configuration settings from the command line.

use clap::Subcommand;
use ipdmeter::config::{ConfigFile, ConfigKey};

use super::common::GlobalArgs;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., measurement.gate_ratio)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., measurement.gate_ratio)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(global: &GlobalArgs, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(global, &key),
        ConfigCommands::Set { key, value } => run_set(global, &key, &value),
        ConfigCommands::List => run_list(global),
        ConfigCommands::Path => run_path(global),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'ipdmeter config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(global: &GlobalArgs, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load_from(&global.config_path())?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value.
fn run_set(global: &GlobalArgs, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let path = global.config_path();

    let mut config = ConfigFile::load_from(&path)?;
    config_key.set(&mut config, value)?;
    config.save_to(&path)?;

    println!("Set {} = {}", config_key.name(), config_key.get(&config));

    Ok(())
}

/// List all configuration settings.
fn run_list(global: &GlobalArgs) -> Result<(), CliError> {
    let config = ConfigFile::load_from(&global.config_path())?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            println!("  {} = (not set)", key.key_name());
        } else {
            println!("  {} = {}", key.key_name(), value);
        }
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path(global: &GlobalArgs) -> Result<(), CliError> {
    println!("{}", global.config_path().display());
    Ok(())
}
