//! Frame observer: landmarks to iris circles and IPD pixels.

use super::landmarks::{indices, LandmarkFrame};
use super::types::{FrameObservation, IrisSample};
use crate::geometry::CircleFitter;

/// Maximum allowed ratio between the larger and smaller iris diameter.
pub const DEFAULT_GATE_RATIO: f64 = 1.15;

/// Floor for the smaller diameter in the ratio denominator.
const MIN_DIAMETER_EPSILON: f64 = 1e-6;

/// Converts landmark frames into [`FrameObservation`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameObserver {
    fitter: CircleFitter,
    gate_ratio: f64,
}

impl Default for FrameObserver {
    fn default() -> Self {
        Self::new(CircleFitter::default(), DEFAULT_GATE_RATIO)
    }
}

impl FrameObserver {
    /// Create an observer with the given fitter and bilateral gate ratio.
    pub fn new(fitter: CircleFitter, gate_ratio: f64) -> Self {
        Self { fitter, gate_ratio }
    }

    /// Observe one frame.
    ///
    /// Returns `None` when the frame is too small or lacks the iris rings.
    pub fn observe(&self, frame: &LandmarkFrame) -> Option<FrameObservation> {
        if !frame.is_usable() {
            tracing::trace!(
                landmarks = frame.landmarks.len(),
                width = frame.width,
                height = frame.height,
                "Frame unusable for iris observation"
            );
            return None;
        }

        let left_ring = frame.pixels(&indices::LEFT_IRIS_RING)?;
        let right_ring = frame.pixels(&indices::RIGHT_IRIS_RING)?;

        let left_iris = self.fitter.fit(&left_ring);
        let right_iris = self.fitter.fit(&right_ring);
        let ipd_px = left_iris.center.distance_to(&right_iris.center);

        let iris = self.gate(left_iris.diameter(), right_iris.diameter());
        if let IrisSample::Gated { ratio } = iris {
            tracing::debug!(
                left_px = format!("{:.2}", left_iris.diameter()),
                right_px = format!("{:.2}", right_iris.diameter()),
                ratio = format!("{:.3}", ratio),
                "Iris diameters disagree, sample gated"
            );
        }

        Some(FrameObservation {
            left_iris,
            right_iris,
            ipd_px,
            iris,
        })
    }

    /// Apply the bilateral consistency gate to a pair of diameters.
    pub fn gate(&self, left_px: f64, right_px: f64) -> IrisSample {
        if !(left_px > 0.0 && right_px > 0.0) {
            return IrisSample::Degenerate;
        }

        let ratio = left_px.max(right_px) / left_px.min(right_px).max(MIN_DIAMETER_EPSILON);
        if ratio > self.gate_ratio {
            IrisSample::Gated { ratio }
        } else {
            IrisSample::Accepted {
                diameter_px: 0.5 * (left_px + right_px),
            }
        }
    }
}
