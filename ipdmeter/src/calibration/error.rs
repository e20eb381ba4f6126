//! Calibration error types.

use thiserror::Error;

use super::types::CalibrationKind;
use crate::store::StoreError;

/// Reasons a calibration session can end without updating the constants.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Iris calibration needs a focal length first.
    #[error("Focal length is not calibrated; run focal calibration first")]
    FocalLengthRequired,

    /// Too few frames passed the bilateral gate within the budget.
    #[error("{kind} calibration failed: {collected} valid frames, {required} required")]
    InsufficientSamples {
        kind: CalibrationKind,
        collected: usize,
        required: usize,
    },

    /// The abort signal fired before the session completed.
    #[error("{kind} calibration aborted after {collected} samples")]
    Aborted {
        kind: CalibrationKind,
        collected: usize,
    },

    /// The solved constant was not a finite positive number.
    #[error("{kind} calibration produced an invalid value: {value}")]
    InvalidSolution { kind: CalibrationKind, value: f64 },

    /// The solved constant could not be persisted.
    #[error("Failed to persist calibration: {0}")]
    Store(#[from] StoreError),
}

impl CalibrationError {
    /// Whether retrying the session may succeed without other changes.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CalibrationError::InsufficientSamples { .. } | CalibrationError::Aborted { .. }
        )
    }
}
