//! IPD Meter - interpupillary distance from facial landmarks
//!
//! This library estimates a subject's real-world interpupillary distance
//! from per-frame iris landmarks using a calibrated pinhole-camera model.
//!
//! # Modules
//!
//! - [`geometry`] - Points, circles and the minimum enclosing circle fitter
//! - [`stream`] - Outlier-resistant median smoothing
//! - [`observation`] - Landmark frames to iris circles and pixel IPD
//! - [`calibration`] - Focal length and iris size calibration sessions
//! - [`estimate`] - Distance and IPD from the pinhole model
//! - [`pipeline`] - The per-frame measurement loop
//! - [`store`] - Persistence for calibration constants
//! - [`config`] - INI configuration file
//! - [`logging`] - Tracing subscriber setup
//! - [`telemetry`] - Processing-rate measurement

pub mod calibration;
pub mod config;
pub mod estimate;
pub mod geometry;
pub mod logging;
pub mod observation;
pub mod pipeline;
pub mod store;
pub mod stream;
pub mod telemetry;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use calibration::{CalibrationError, CalibrationKind};
pub use observation::LandmarkFrame;
pub use pipeline::{IpdMeter, MeasurementReport, MeasurementWarning, MeterConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!VERSION.is_empty(), "Version should not be empty");
    }
}
