//! Subject distance from the smoothed iris diameter.

use serde::Serialize;

use crate::calibration::{CalibrationConstants, DEFAULT_REFERENCE_DISTANCE_CM};

/// How a distance value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMode {
    /// Assumed reference distance.
    Fixed,
    /// Pinhole-model estimate.
    Estimated,
    /// Not enough inputs.
    Unavailable,
}

impl DistanceMode {
    /// Lowercase tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMode::Fixed => "fixed",
            DistanceMode::Estimated => "estimated",
            DistanceMode::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for DistanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subject-to-camera distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceEstimate {
    /// The configured reference distance (cm).
    Fixed(f64),
    /// `f_px × iris_cm / diameter` (cm).
    Estimated(f64),
    /// Focal length or smoothed diameter missing.
    Unavailable,
}

impl DistanceEstimate {
    /// Distance in centimeters, if available.
    pub fn cm(&self) -> Option<f64> {
        match self {
            DistanceEstimate::Fixed(cm) | DistanceEstimate::Estimated(cm) => Some(*cm),
            DistanceEstimate::Unavailable => None,
        }
    }

    /// How the distance was obtained.
    pub fn mode(&self) -> DistanceMode {
        match self {
            DistanceEstimate::Fixed(_) => DistanceMode::Fixed,
            DistanceEstimate::Estimated(_) => DistanceMode::Estimated,
            DistanceEstimate::Unavailable => DistanceMode::Unavailable,
        }
    }
}

/// Pinhole-model distance estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceEstimator {
    fixed_distance_cm: f64,
}

impl Default for DistanceEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_DISTANCE_CM)
    }
}

impl DistanceEstimator {
    /// Create an estimator that reports `fixed_distance_cm` in fixed mode.
    pub fn new(fixed_distance_cm: f64) -> Self {
        Self { fixed_distance_cm }
    }

    /// Estimate the distance for one frame.
    pub fn estimate(
        &self,
        use_fixed: bool,
        constants: &CalibrationConstants,
        smoothed_diameter_px: Option<f64>,
    ) -> DistanceEstimate {
        if use_fixed {
            return DistanceEstimate::Fixed(self.fixed_distance_cm);
        }

        match (constants.f_px, smoothed_diameter_px) {
            (Some(f_px), Some(diameter)) if diameter > 0.0 => {
                DistanceEstimate::Estimated(f_px * constants.iris_cm / diameter)
            }
            _ => DistanceEstimate::Unavailable,
        }
    }
}
