//! Two-stage calibration of the pinhole-model constants.
//!
//! Distance estimation needs two physical constants: the camera's
//! focal-equivalent length in pixels (`f_px`) and the subject's iris
//! diameter in centimeters (`iris_cm`). Each is solved by a short session
//! in which the subject holds still at a known reference distance.
//!
//! # Module Structure
//!
//! - [`types`] - Session kinds, budgets, constants and results
//! - [`clock`] - Wall and virtual time sources
//! - [`source`] - Frame sources polled during a session
//! - [`controller`] - Session protocol and constant persistence
//! - [`error`] - Session failure reasons
//!
//! # Session Protocol
//!
//! ```text
//! start ──► deadline = now + budget
//!   │
//!   ▼
//! while now < deadline && samples < cap:
//!     abort? ──► Aborted
//!     frame ──► FrameObserver ──► Accepted(d)? ──► push d
//!     sleep(poll interval)
//!   │
//!   ▼
//! samples < min ──► InsufficientSamples
//!   │
//!   ▼
//! FOCAL: f_px    = median(d) × D0 / iris_cm
//! IRIS:  iris_cm = median(d) × D0 / f_px
//!   │
//!   ▼
//! persist ──► swap constants
//! ```
//!
//! The first session (FOCAL) assumes the population-average iris size. The
//! optional second session (IRIS) personalizes it once `f_px` is known.

pub mod clock;
pub mod controller;
pub mod error;
pub mod source;
pub mod types;

pub use clock::{BoxFuture, Clock, ManualClock, TokioClock};
pub use controller::CalibrationController;
pub use error::CalibrationError;
pub use source::{FrameSource, ReplaySource};
pub use types::{
    CalibrationConfig, CalibrationConstants, CalibrationKind, CalibrationResult, SessionBudget,
    DEFAULT_IRIS_CM, DEFAULT_REFERENCE_DISTANCE_CM, FOCAL_LENGTH_KEY, IRIS_DIAMETER_KEY,
};
