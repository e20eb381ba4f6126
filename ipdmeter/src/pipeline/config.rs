//! Measurement pipeline configuration.

use crate::calibration::{
    CalibrationConfig, SessionBudget, DEFAULT_IRIS_CM, DEFAULT_REFERENCE_DISTANCE_CM,
};
use crate::estimate::DEFAULT_IPD_OFFSET_CM;
use crate::geometry::{CircleFitter, DEFAULT_FIT_TOLERANCE_PX};
use crate::observation::{FrameObserver, DEFAULT_GATE_RATIO};
use crate::stream::StreamConfig;

/// Configuration for an [`IpdMeter`](super::IpdMeter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterConfig {
    /// Reference distance D0 used by calibration and fixed-distance mode (cm).
    pub reference_distance_cm: f64,

    /// Start in fixed-distance mode.
    pub use_fixed_distance: bool,

    /// Population-average iris diameter (cm).
    pub default_iris_cm: f64,

    /// Bilateral iris gate ratio.
    pub gate_ratio: f64,

    /// Additive IPD display offset (cm).
    pub ipd_offset_cm: f64,

    /// Circle containment tolerance (pixels).
    pub fit_tolerance_px: f64,

    /// Live stream tuning, shared by the iris and IPD streams.
    pub stream: StreamConfig,

    /// Focal length session budget.
    pub focal: SessionBudget,

    /// Iris size session budget.
    pub iris: SessionBudget,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            reference_distance_cm: DEFAULT_REFERENCE_DISTANCE_CM,
            use_fixed_distance: false,
            default_iris_cm: DEFAULT_IRIS_CM,
            gate_ratio: DEFAULT_GATE_RATIO,
            ipd_offset_cm: DEFAULT_IPD_OFFSET_CM,
            fit_tolerance_px: DEFAULT_FIT_TOLERANCE_PX,
            stream: StreamConfig::default(),
            focal: SessionBudget::focal(),
            iris: SessionBudget::iris(),
        }
    }
}

impl MeterConfig {
    /// Frame observer built from this configuration.
    pub fn observer(&self) -> FrameObserver {
        FrameObserver::new(CircleFitter::new(self.fit_tolerance_px), self.gate_ratio)
    }

    /// Calibration parameters built from this configuration.
    pub fn calibration(&self) -> CalibrationConfig {
        CalibrationConfig {
            reference_distance_cm: self.reference_distance_cm,
            default_iris_cm: self.default_iris_cm,
            focal: self.focal,
            iris: self.iris,
        }
    }
}
