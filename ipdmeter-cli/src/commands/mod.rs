//! CLI command implementations.

pub mod calibrate;
pub mod common;
pub mod config;
pub mod init;
pub mod reset;
pub mod run;
pub mod status;
