//! Observation value types.

use serde::Serialize;

use crate::geometry::Circle;

/// Per-frame iris diameter sample after the bilateral consistency gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IrisSample {
    /// Both eyes agree; the mean diameter (pixels) is usable.
    Accepted {
        /// Mean of the left and right diameters.
        diameter_px: f64,
    },

    /// Eye diameters disagree beyond the gate ratio (off-axis gaze).
    Gated {
        /// Larger diameter divided by the smaller one.
        ratio: f64,
    },

    /// At least one eye produced a zero-size circle.
    Degenerate,
}

impl IrisSample {
    /// The usable diameter, if the sample passed the gate.
    pub fn diameter_px(&self) -> Option<f64> {
        match self {
            IrisSample::Accepted { diameter_px } => Some(*diameter_px),
            IrisSample::Gated { .. } | IrisSample::Degenerate => None,
        }
    }

    /// Whether the sample was withheld by the bilateral gate.
    pub fn is_gated(&self) -> bool {
        matches!(self, IrisSample::Gated { .. })
    }
}

/// Measurements derived from a single frame.
///
/// Lives only for the frame that produced it; the live pipeline folds its
/// scalars into the robust streams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameObservation {
    /// Fitted left iris circle (pixels).
    pub left_iris: Circle,

    /// Fitted right iris circle (pixels).
    pub right_iris: Circle,

    /// Distance between iris centers (pixels).
    pub ipd_px: f64,

    /// Gated iris diameter sample.
    pub iris: IrisSample,
}
