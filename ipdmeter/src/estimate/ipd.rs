//! Real-world IPD from the smoothed pixel IPD.

use serde::Serialize;

/// Additive correction applied to the raw pinhole IPD (cm).
pub const DEFAULT_IPD_OFFSET_CM: f64 = 0.6;

/// An IPD estimate in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IpdEstimate {
    /// `ipd_px × distance_cm / f_px`.
    pub raw_cm: f64,

    /// `raw_cm` plus the display offset.
    pub display_cm: f64,
}

/// Pinhole-model IPD estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IpdEstimator {
    offset_cm: f64,
}

impl Default for IpdEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_IPD_OFFSET_CM)
    }
}

impl IpdEstimator {
    /// Create an estimator with the given display offset.
    pub fn new(offset_cm: f64) -> Self {
        Self { offset_cm }
    }

    /// Estimate the IPD; `None` if any input is missing.
    ///
    /// The offset is only added to a computed raw value.
    pub fn estimate(
        &self,
        smoothed_ipd_px: Option<f64>,
        distance_cm: Option<f64>,
        f_px: Option<f64>,
    ) -> Option<IpdEstimate> {
        let raw_cm = smoothed_ipd_px? * distance_cm? / f_px?;
        if !raw_cm.is_finite() {
            return None;
        }
        Some(IpdEstimate {
            raw_cm,
            display_cm: raw_cm + self.offset_cm,
        })
    }
}
