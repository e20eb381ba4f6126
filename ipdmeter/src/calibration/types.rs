//! Core calibration types.
//!
//! Contains the session kinds and budgets, the calibration constants value
//! object, and session results.

use std::time::Duration;

use serde::Serialize;

use crate::store::{KeyValueStore, StoreError, StoreWrite};

/// Store key for the focal-equivalent length in pixels.
pub const FOCAL_LENGTH_KEY: &str = "ipd_fpx";

/// Store key for the physical iris diameter in centimeters.
pub const IRIS_DIAMETER_KEY: &str = "ipd_iris_cm";

/// Population-average human iris diameter (cm).
pub const DEFAULT_IRIS_CM: f64 = 1.17;

/// Assumed subject distance during calibration and in fixed-distance mode (cm).
pub const DEFAULT_REFERENCE_DISTANCE_CM: f64 = 30.0;

/// Deviation from the default beyond which the iris size counts as personalized (cm).
const PERSONALIZED_EPSILON_CM: f64 = 1e-3;

/// Which constant a calibration session solves for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationKind {
    /// Solve `f_px` from the current iris size at the reference distance.
    Focal,
    /// Solve `iris_cm` from the current `f_px` at the reference distance.
    Iris,
}

impl CalibrationKind {
    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            CalibrationKind::Focal => "focal length",
            CalibrationKind::Iris => "personal iris size",
        }
    }
}

impl std::fmt::Display for CalibrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalibrationKind::Focal => write!(f, "focal"),
            CalibrationKind::Iris => write!(f, "iris"),
        }
    }
}

impl std::str::FromStr for CalibrationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "focal" | "fpx" | "f_px" => Ok(CalibrationKind::Focal),
            "iris" => Ok(CalibrationKind::Iris),
            other => Err(format!("unknown calibration kind '{}'", other)),
        }
    }
}

/// Time and sample limits for one calibration session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBudget {
    /// Wall-clock budget from session start.
    pub time_budget: Duration,

    /// Session ends early once this many samples are collected.
    pub max_samples: usize,

    /// Fewer samples than this fails the session.
    pub min_samples: usize,

    /// Pause between frame polls.
    pub poll_interval: Duration,
}

impl SessionBudget {
    /// Budget for focal length sessions: 3 s, 20 samples.
    pub fn focal() -> Self {
        Self {
            time_budget: Duration::from_millis(3000),
            max_samples: 20,
            min_samples: 10,
            poll_interval: Duration::from_millis(30),
        }
    }

    /// Budget for iris size sessions: 2 s, 20 samples.
    pub fn iris() -> Self {
        Self {
            time_budget: Duration::from_millis(2000),
            ..Self::focal()
        }
    }
}

/// Calibration parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConfig {
    /// Distance the subject holds during calibration (cm).
    pub reference_distance_cm: f64,

    /// Default physical iris diameter (cm).
    pub default_iris_cm: f64,

    /// Budget for focal length sessions.
    pub focal: SessionBudget,

    /// Budget for iris size sessions.
    pub iris: SessionBudget,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            reference_distance_cm: DEFAULT_REFERENCE_DISTANCE_CM,
            default_iris_cm: DEFAULT_IRIS_CM,
            focal: SessionBudget::focal(),
            iris: SessionBudget::iris(),
        }
    }
}

impl CalibrationConfig {
    /// Budget for the given session kind.
    pub fn budget(&self, kind: CalibrationKind) -> SessionBudget {
        match kind {
            CalibrationKind::Focal => self.focal,
            CalibrationKind::Iris => self.iris,
        }
    }
}

/// The two physical constants of the pinhole model.
///
/// `iris_cm` is always finite and positive; `f_px` is either unset or finite
/// and positive. Values are replaced wholesale, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationConstants {
    /// Focal-equivalent length (pixels), if calibrated.
    pub f_px: Option<f64>,

    /// Physical iris diameter (cm).
    pub iris_cm: f64,

    /// Fallback iris diameter (cm).
    pub default_iris_cm: f64,
}

impl CalibrationConstants {
    /// Uncalibrated constants.
    pub fn new(default_iris_cm: f64) -> Self {
        let default_iris_cm = valid_positive(default_iris_cm).unwrap_or(DEFAULT_IRIS_CM);
        Self {
            f_px: None,
            iris_cm: default_iris_cm,
            default_iris_cm,
        }
    }

    /// Load constants from a store.
    ///
    /// Missing, unparsable, or non-positive stored values fall back to the
    /// defaults.
    pub fn load(store: &dyn KeyValueStore, default_iris_cm: f64) -> Result<Self, StoreError> {
        let defaults = Self::new(default_iris_cm);

        let f_px = parse_stored(store, FOCAL_LENGTH_KEY)?;
        let iris_cm = parse_stored(store, IRIS_DIAMETER_KEY)?.unwrap_or(defaults.default_iris_cm);

        Ok(Self {
            f_px,
            iris_cm,
            ..defaults
        })
    }

    /// Write both constants to a store in one batch.
    ///
    /// An unset `f_px` removes its key.
    pub fn persist(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        let focal = match self.f_px {
            Some(f_px) => StoreWrite::set(FOCAL_LENGTH_KEY, f_px.to_string()),
            None => StoreWrite::remove(FOCAL_LENGTH_KEY),
        };
        store.apply(&[
            focal,
            StoreWrite::set(IRIS_DIAMETER_KEY, self.iris_cm.to_string()),
        ])
    }

    /// Copy with a new focal length.
    pub fn with_focal_length(self, f_px: f64) -> Self {
        Self {
            f_px: Some(f_px),
            ..self
        }
    }

    /// Copy with a new iris diameter.
    pub fn with_iris_cm(self, iris_cm: f64) -> Self {
        Self { iris_cm, ..self }
    }

    /// Copy with both constants at their defaults.
    pub fn reset(self) -> Self {
        Self::new(self.default_iris_cm)
    }

    /// Whether a focal length is available.
    pub fn is_calibrated(&self) -> bool {
        self.f_px.is_some()
    }

    /// Whether `iris_cm` has been personalized away from the default.
    pub fn is_personalized(&self) -> bool {
        (self.iris_cm - self.default_iris_cm).abs() > PERSONALIZED_EPSILON_CM
    }
}

impl Default for CalibrationConstants {
    fn default() -> Self {
        Self::new(DEFAULT_IRIS_CM)
    }
}

/// Successful session outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationResult {
    /// Session kind.
    pub kind: CalibrationKind,

    /// Solved constant (`f_px` in pixels or `iris_cm` in centimeters).
    pub value: f64,

    /// Median mean-iris diameter over the session (pixels).
    pub median_diameter_px: f64,

    /// Number of samples used.
    pub sample_count: usize,
}

pub(crate) fn valid_positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

fn parse_stored(store: &dyn KeyValueStore, key: &str) -> Result<Option<f64>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let parsed = raw.trim().parse::<f64>().ok().and_then(valid_positive);
    if parsed.is_none() {
        tracing::warn!(key = key, value = %raw, "Ignoring invalid stored calibration value");
    }
    Ok(parsed)
}
