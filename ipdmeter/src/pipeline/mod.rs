//! The live measurement pipeline.
//!
//! # Per-Frame Flow
//!
//! ```text
//! LandmarkFrame ──► FrameObserver ──┬─► iris sample ──► RobustStream (iris) ──► DistanceEstimator ─┐
//!                                   │                                                              │
//!                                   └─► ipd_px ───────► RobustStream (ipd) ───────────────────────┴─► IpdEstimator
//!                                                                                                        │
//!                                                                                                        ▼
//!                                                                                               MeasurementReport
//! ```
//!
//! Calibration sessions bypass the live streams and clear them on success.

mod config;
mod meter;
mod report;

pub use config::MeterConfig;
pub use meter::IpdMeter;
pub use report::{MeasurementReport, MeasurementWarning};
