//! Per-frame measurement report.

use serde::Serialize;

use crate::estimate::DistanceMode;

/// Advisory tag attached to a frame's report.
///
/// At most one is reported per frame, in priority order: no face, off-axis
/// gaze, outlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasurementWarning {
    /// No landmarks were available for the frame.
    NoFace,
    /// Eye diameters disagreed; the iris sample was withheld.
    OffAxisGaze,
    /// A live stream rejected the frame's value.
    Outlier,
}

impl MeasurementWarning {
    /// Stable tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementWarning::NoFace => "no-face",
            MeasurementWarning::OffAxisGaze => "off-axis-gaze",
            MeasurementWarning::Outlier => "outlier",
        }
    }

    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            MeasurementWarning::NoFace => "no face detected",
            MeasurementWarning::OffAxisGaze => "off-axis gaze (iris mismatch)",
            MeasurementWarning::Outlier => "measurement rejected as outlier",
        }
    }
}

impl std::fmt::Display for MeasurementWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of processing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementReport {
    /// Subject distance (cm).
    pub distance_cm: Option<f64>,

    /// How the distance was obtained.
    pub distance_mode: DistanceMode,

    /// Smoothed IPD (pixels).
    pub ipd_px: Option<f64>,

    /// IPD including the display offset (cm).
    pub ipd_cm: Option<f64>,

    /// Advisory warning, if any.
    pub warning: Option<MeasurementWarning>,
}

impl std::fmt::Display for MeasurementReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.distance_cm {
            Some(cm) => write!(f, "distance {:.1} cm ({})", cm, self.distance_mode)?,
            None => write!(f, "distance --")?,
        }
        match self.ipd_px {
            Some(px) => write!(f, " | ipd {:.1} px", px)?,
            None => write!(f, " | ipd -- px")?,
        }
        match self.ipd_cm {
            Some(cm) => write!(f, ", {:.2} cm", cm)?,
            None => write!(f, ", -- cm")?,
        }
        if let Some(warning) = self.warning {
            write!(f, " [{}]", warning.description())?;
        }
        Ok(())
    }
}
