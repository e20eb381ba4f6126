//! Pinhole-model estimates.
//!
//! ```text
//! distance_cm = f_px × iris_cm / smoothed_iris_px      (or the fixed D0)
//! ipd_cm      = smoothed_ipd_px × distance_cm / f_px + offset
//! ```

mod distance;
mod ipd;

pub use distance::{DistanceEstimate, DistanceEstimator, DistanceMode};
pub use ipd::{IpdEstimate, IpdEstimator, DEFAULT_IPD_OFFSET_CM};
