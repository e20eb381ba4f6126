//! The per-frame measurement loop.

use std::time::Instant;

use tokio_util::sync::CancellationToken;

use super::config::MeterConfig;
use super::report::{MeasurementReport, MeasurementWarning};
use crate::calibration::{
    CalibrationConstants, CalibrationController, CalibrationError, CalibrationKind,
    CalibrationResult, Clock, FrameSource,
};
use crate::estimate::{DistanceEstimator, IpdEstimator};
use crate::observation::{FrameObserver, LandmarkFrame};
use crate::store::{SharedStore, StoreError};
use crate::stream::{RobustStream, StreamOutcome};
use crate::telemetry::FrameRateMeter;

/// Turns landmark frames into distance and IPD measurements.
///
/// Owns the two live streams (iris diameter and IPD in pixels) and the
/// calibration controller. Calibration and reset take `&mut self`, so they
/// can never interleave with frame processing.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use ipdmeter::pipeline::{IpdMeter, MeterConfig};
/// use ipdmeter::store::MemoryStore;
///
/// let mut meter = IpdMeter::new(MeterConfig::default(), Arc::new(MemoryStore::new())).unwrap();
/// let report = meter.process_frame(None);
/// assert!(report.ipd_cm.is_none());
/// ```
#[derive(Debug)]
pub struct IpdMeter {
    config: MeterConfig,
    observer: FrameObserver,
    iris_stream: RobustStream,
    ipd_stream: RobustStream,
    distance: DistanceEstimator,
    ipd: IpdEstimator,
    calibration: CalibrationController,
    use_fixed_distance: bool,
    frame_rate: FrameRateMeter,
}

impl IpdMeter {
    /// Create a meter, loading calibration constants from `store`.
    pub fn new(config: MeterConfig, store: SharedStore) -> Result<Self, StoreError> {
        let observer = config.observer();
        let calibration = CalibrationController::new(config.calibration(), observer, store)?;

        Ok(Self {
            config,
            observer,
            iris_stream: RobustStream::new(config.stream),
            ipd_stream: RobustStream::new(config.stream),
            distance: DistanceEstimator::new(config.reference_distance_cm),
            ipd: IpdEstimator::new(config.ipd_offset_cm),
            calibration,
            use_fixed_distance: config.use_fixed_distance,
            frame_rate: FrameRateMeter::default(),
        })
    }

    /// Process one frame; `None` means no face was detected.
    pub fn process_frame(&mut self, frame: Option<&LandmarkFrame>) -> MeasurementReport {
        self.frame_rate.record(Instant::now());

        let observation = frame.and_then(|f| self.observer.observe(f));

        let (iris, ipd, warning) = match observation {
            None => (
                self.iris_stream.observe(None),
                self.ipd_stream.observe(None),
                Some(MeasurementWarning::NoFace),
            ),
            Some(observation) => {
                let iris = self.iris_stream.observe(observation.iris.diameter_px());
                let ipd = self.ipd_stream.observe(Some(observation.ipd_px));

                let warning = if observation.iris.is_gated() {
                    Some(MeasurementWarning::OffAxisGaze)
                } else if iris.outcome == StreamOutcome::Rejected
                    || ipd.outcome == StreamOutcome::Rejected
                {
                    Some(MeasurementWarning::Outlier)
                } else {
                    None
                };
                (iris, ipd, warning)
            }
        };

        let constants = self.calibration.constants();
        let distance = self
            .distance
            .estimate(self.use_fixed_distance, constants, iris.estimate);
        let ipd_cm = self
            .ipd
            .estimate(ipd.estimate, distance.cm(), constants.f_px)
            .map(|estimate| estimate.display_cm);

        tracing::trace!(
            iris = %iris.outcome,
            ipd = %ipd.outcome,
            distance_mode = %distance.mode(),
            warning = ?warning,
            "Frame processed"
        );

        MeasurementReport {
            distance_cm: distance.cm(),
            distance_mode: distance.mode(),
            ipd_px: ipd.estimate,
            ipd_cm,
            warning,
        }
    }

    /// Run a calibration session and, on success, restart both live streams.
    pub async fn calibrate<S, C>(
        &mut self,
        kind: CalibrationKind,
        source: &mut S,
        clock: &C,
        abort: &CancellationToken,
    ) -> Result<CalibrationResult, CalibrationError>
    where
        S: FrameSource + ?Sized,
        C: Clock + ?Sized,
    {
        let result = self.calibration.run(kind, source, clock, abort).await?;
        self.clear_streams();
        Ok(result)
    }

    /// Reset both constants to their defaults and restart both live streams.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.calibration.reset()?;
        self.clear_streams();
        Ok(())
    }

    /// Switch fixed-distance mode on or off.
    pub fn set_fixed_distance(&mut self, enabled: bool) {
        if self.use_fixed_distance != enabled {
            tracing::debug!(enabled = enabled, "Fixed distance mode changed");
        }
        self.use_fixed_distance = enabled;
    }

    /// Whether fixed-distance mode is on.
    pub fn uses_fixed_distance(&self) -> bool {
        self.use_fixed_distance
    }

    /// Current calibration constants.
    pub fn constants(&self) -> &CalibrationConstants {
        self.calibration.constants()
    }

    /// Meter configuration.
    pub fn config(&self) -> &MeterConfig {
        &self.config
    }

    /// Processing rate over recent frames.
    pub fn frame_rate(&self) -> &FrameRateMeter {
        &self.frame_rate
    }

    /// Smoothed iris diameter (pixels).
    pub fn smoothed_iris_px(&self) -> Option<f64> {
        self.iris_stream.current()
    }

    /// Smoothed IPD (pixels).
    pub fn smoothed_ipd_px(&self) -> Option<f64> {
        self.ipd_stream.current()
    }

    fn clear_streams(&mut self) {
        self.iris_stream.clear();
        self.ipd_stream.clear();
        tracing::debug!("Live streams cleared");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::calibration::{ManualClock, FOCAL_LENGTH_KEY};
    use crate::estimate::DistanceMode;
    use crate::observation::indices;
    use crate::store::MemoryStore;

    /// Frame with both irises of the given pixel diameters, `ipd` pixels apart.
    fn frame(left_px: f64, right_px: f64, ipd: f64) -> LandmarkFrame {
        let (width, height) = (1280u32, 720u32);
        let mut landmarks = vec![[0.5, 0.5]; indices::REQUIRED_LANDMARKS];
        let mut place = |ring: [usize; 4], cx: f64, diameter: f64| {
            let r = diameter / 2.0;
            let offsets = [(r, 0.0), (0.0, r), (-r, 0.0), (0.0, -r)];
            for (idx, (dx, dy)) in ring.iter().zip(offsets) {
                landmarks[*idx] = [(cx + dx) / width as f64, (360.0 + dy) / height as f64];
            }
        };
        place(indices::LEFT_IRIS_RING, 640.0 - ipd / 2.0, left_px);
        place(indices::RIGHT_IRIS_RING, 640.0 + ipd / 2.0, right_px);
        LandmarkFrame::new(width, height, landmarks)
    }

    fn meter_with(entries: &[(&str, &str)]) -> IpdMeter {
        let store = Arc::new(MemoryStore::with_entries(entries.iter().copied()));
        IpdMeter::new(MeterConfig::default(), store).unwrap()
    }

    #[test]
    fn test_no_face_report() {
        let mut meter = meter_with(&[]);
        let report = meter.process_frame(None);
        assert_eq!(report.warning, Some(MeasurementWarning::NoFace));
        assert_eq!(report.distance_mode, DistanceMode::Unavailable);
        assert!(report.ipd_px.is_none());
        assert!(report.ipd_cm.is_none());
    }

    #[test]
    fn test_uncalibrated_reports_pixels_only() {
        let mut meter = meter_with(&[]);
        let report = meter.process_frame(Some(&frame(20.0, 20.0, 120.0)));
        assert!(report.warning.is_none());
        assert!((report.ipd_px.unwrap() - 120.0).abs() < 1e-6);
        assert!(report.distance_cm.is_none());
        assert!(report.ipd_cm.is_none());
    }

    #[test]
    fn test_calibrated_measurement() {
        let mut meter = meter_with(&[(FOCAL_LENGTH_KEY, "600")]);
        let report = meter.process_frame(Some(&frame(23.4, 23.4, 130.0)));

        // 600 × 1.17 / 23.4 = 30 cm; 130 × 30 / 600 + 0.6 = 7.1 cm
        assert_eq!(report.distance_mode, DistanceMode::Estimated);
        assert!((report.distance_cm.unwrap() - 30.0).abs() < 1e-6);
        assert!((report.ipd_cm.unwrap() - 7.1).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_distance_mode() {
        let mut meter = meter_with(&[(FOCAL_LENGTH_KEY, "500")]);
        meter.set_fixed_distance(true);
        let report = meter.process_frame(Some(&frame(20.0, 20.0, 100.0)));

        assert_eq!(report.distance_mode, DistanceMode::Fixed);
        assert_eq!(report.distance_cm, Some(30.0));
        assert!((report.ipd_cm.unwrap() - 6.6).abs() < 1e-6);
    }

    #[test]
    fn test_off_axis_gaze_withholds_iris() {
        let mut meter = meter_with(&[(FOCAL_LENGTH_KEY, "600")]);
        let report = meter.process_frame(Some(&frame(20.0, 30.0, 120.0)));

        assert_eq!(report.warning, Some(MeasurementWarning::OffAxisGaze));
        assert!(meter.smoothed_iris_px().is_none());
        assert!(report.ipd_px.is_some());
        assert!(report.distance_cm.is_none());
    }

    #[test]
    fn test_outlier_warning_holds_estimate() {
        let mut meter = meter_with(&[]);
        for _ in 0..6 {
            meter.process_frame(Some(&frame(20.0, 20.0, 120.0)));
        }
        let report = meter.process_frame(Some(&frame(20.0, 20.0, 300.0)));

        assert_eq!(report.warning, Some(MeasurementWarning::Outlier));
        assert!((report.ipd_px.unwrap() - 120.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset_clears_streams_and_constants() {
        let mut meter = meter_with(&[(FOCAL_LENGTH_KEY, "600")]);
        meter.process_frame(Some(&frame(20.0, 20.0, 120.0)));
        assert!(meter.smoothed_ipd_px().is_some());

        meter.reset().unwrap();

        assert!(meter.constants().f_px.is_none());
        assert!(meter.smoothed_ipd_px().is_none());
        assert!(meter.smoothed_iris_px().is_none());
    }

    #[tokio::test]
    async fn test_calibration_clears_streams() {
        let mut meter = meter_with(&[]);
        meter.process_frame(Some(&frame(20.0, 20.0, 120.0)));

        let mut source = || Some(frame(200.0, 200.0, 120.0));
        meter
            .calibrate(
                CalibrationKind::Focal,
                &mut source,
                &ManualClock::new(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(meter.smoothed_ipd_px().is_none());
        assert!((meter.constants().f_px.unwrap() - 200.0 * 30.0 / 1.17).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_failed_calibration_keeps_streams() {
        let mut meter = meter_with(&[]);
        meter.process_frame(Some(&frame(20.0, 20.0, 120.0)));

        let mut source = || -> Option<LandmarkFrame> { None };
        let result = meter
            .calibrate(
                CalibrationKind::Focal,
                &mut source,
                &ManualClock::new(),
                &CancellationToken::new(),
            )
            .await;

        assert!(result.is_err());
        assert!(meter.smoothed_ipd_px().is_some());
    }
}
