//! Calibration session controller.
//!
//! Runs time- and sample-boxed sessions that solve one pinhole-model
//! constant, persists the result, and swaps it into the active constants.

use tokio_util::sync::CancellationToken;

use super::clock::Clock;
use super::error::CalibrationError;
use super::source::FrameSource;
use super::types::{
    valid_positive, CalibrationConfig, CalibrationConstants, CalibrationKind, CalibrationResult,
    SessionBudget,
};
use crate::observation::FrameObserver;
use crate::store::{SharedStore, StoreError};
use crate::stream::median;

/// Owns the calibration constants and the store they are persisted to.
///
/// Constants change only through [`run`](Self::run) and
/// [`reset`](Self::reset), each of which needs `&mut self`, so at most one
/// session can be in flight.
pub struct CalibrationController {
    config: CalibrationConfig,
    observer: FrameObserver,
    store: SharedStore,
    constants: CalibrationConstants,
}

impl std::fmt::Debug for CalibrationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationController")
            .field("config", &self.config)
            .field("constants", &self.constants)
            .finish_non_exhaustive()
    }
}

impl CalibrationController {
    /// Create a controller, loading the constants from `store`.
    pub fn new(
        config: CalibrationConfig,
        observer: FrameObserver,
        store: SharedStore,
    ) -> Result<Self, StoreError> {
        let constants = CalibrationConstants::load(store.as_ref(), config.default_iris_cm)?;

        tracing::debug!(
            f_px = ?constants.f_px,
            iris_cm = constants.iris_cm,
            "Loaded calibration constants"
        );

        Ok(Self {
            config,
            observer,
            store,
            constants,
        })
    }

    /// Current constants.
    pub fn constants(&self) -> &CalibrationConstants {
        &self.constants
    }

    /// Calibration parameters.
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Run one calibration session.
    ///
    /// Polls `source` every poll interval until the time budget elapses or
    /// the sample cap is reached. On success the solved constant is
    /// persisted and then swapped in. On any error the constants are left
    /// unchanged.
    pub async fn run<S, C>(
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
        let f_px = self.constants.f_px;
        if kind == CalibrationKind::Iris && f_px.is_none() {
            tracing::warn!("Iris calibration requested without a focal length");
            return Err(CalibrationError::FocalLengthRequired);
        }

        let budget = self.config.budget(kind);
        tracing::info!(
            kind = %kind,
            budget_ms = budget.time_budget.as_millis() as u64,
            max_samples = budget.max_samples,
            "Calibration started"
        );

        let samples = self
            .collect_samples(kind, budget, source, clock, abort)
            .await
            .inspect_err(|e| tracing::warn!(kind = %kind, error = %e, "Calibration aborted"))?;

        if samples.len() < budget.min_samples {
            tracing::warn!(
                kind = %kind,
                samples = samples.len(),
                min_required = budget.min_samples,
                "Calibration failed: insufficient samples"
            );
            return Err(CalibrationError::InsufficientSamples {
                kind,
                collected: samples.len(),
                required: budget.min_samples,
            });
        }

        // min_samples may be configured to 0
        let median_diameter_px = median(&samples).unwrap_or(0.0);
        let reference_cm = self.config.reference_distance_cm;

        let (value, constants) = match kind {
            CalibrationKind::Focal => {
                let value = median_diameter_px * reference_cm / self.constants.iris_cm;
                (value, self.constants.with_focal_length(value))
            }
            CalibrationKind::Iris => {
                let f_px = f_px.ok_or(CalibrationError::FocalLengthRequired)?;
                let value = median_diameter_px * reference_cm / f_px;
                (value, self.constants.with_iris_cm(value))
            }
        };

        if valid_positive(value).is_none() {
            tracing::warn!(kind = %kind, value = value, "Calibration produced an invalid value");
            return Err(CalibrationError::InvalidSolution { kind, value });
        }

        constants.persist(self.store.as_ref())?;
        self.constants = constants;

        tracing::info!(
            kind = %kind,
            value = format!("{:.3}", value),
            median_px = format!("{:.2}", median_diameter_px),
            samples = samples.len(),
            "Calibration complete"
        );

        Ok(CalibrationResult {
            kind,
            value,
            median_diameter_px,
            sample_count: samples.len(),
        })
    }

    /// Clear `f_px` and restore the default iris size, in memory and in the store.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        let constants = self.constants.reset();
        constants.persist(self.store.as_ref())?;
        self.constants = constants;

        tracing::info!(iris_cm = constants.iris_cm, "Calibration reset");
        Ok(())
    }

    async fn collect_samples<S, C>(
        &self,
        kind: CalibrationKind,
        budget: SessionBudget,
        source: &mut S,
        clock: &C,
        abort: &CancellationToken,
    ) -> Result<Vec<f64>, CalibrationError>
    where
        S: FrameSource + ?Sized,
        C: Clock + ?Sized,
    {
        let deadline = clock.now() + budget.time_budget;
        let mut samples = Vec::with_capacity(budget.max_samples);

        while clock.now() < deadline && samples.len() < budget.max_samples {
            if abort.is_cancelled() {
                return Err(CalibrationError::Aborted {
                    kind,
                    collected: samples.len(),
                });
            }

            let diameter = source
                .next_frame()
                .and_then(|frame| self.observer.observe(&frame))
                .and_then(|observation| observation.iris.diameter_px());
            if let Some(diameter) = diameter {
                samples.push(diameter);
            }

            tokio::select! {
                biased;
                _ = abort.cancelled() => {
                    return Err(CalibrationError::Aborted {
                        kind,
                        collected: samples.len(),
                    });
                }
                _ = clock.sleep(budget.poll_interval) => {}
            }
        }

        tracing::trace!(kind = %kind, samples = samples.len(), "Calibration sampling finished");
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::calibration::clock::ManualClock;
    use crate::calibration::types::{FOCAL_LENGTH_KEY, IRIS_DIAMETER_KEY};
    use crate::observation::{indices, LandmarkFrame};
    use crate::store::{KeyValueStore, MemoryStore};

    const WIDTH: u32 = 1000;
    const HEIGHT: u32 = 1000;

    /// Frame with both irises of the given pixel diameters.
    fn iris_frame(left_px: f64, right_px: f64) -> LandmarkFrame {
        let mut landmarks = vec![[0.5, 0.5]; indices::REQUIRED_LANDMARKS];
        let mut place = |ring: [usize; 4], cx: f64, diameter: f64| {
            let r = diameter / 2.0;
            let offsets = [(r, 0.0), (0.0, r), (-r, 0.0), (0.0, -r)];
            for (idx, (dx, dy)) in ring.iter().zip(offsets) {
                landmarks[*idx] = [(cx + dx) / WIDTH as f64, (500.0 + dy) / HEIGHT as f64];
            }
        };
        place(indices::LEFT_IRIS_RING, 400.0, left_px);
        place(indices::RIGHT_IRIS_RING, 600.0, right_px);
        LandmarkFrame::new(WIDTH, HEIGHT, landmarks)
    }

    /// Source yielding `valid` good frames then nothing.
    fn limited_source(valid: usize, diameter: f64) -> impl FnMut() -> Option<LandmarkFrame> + Send {
        let mut served = 0;
        move || {
            served += 1;
            (served <= valid).then(|| iris_frame(diameter, diameter))
        }
    }

    fn controller(store: Arc<MemoryStore>) -> CalibrationController {
        CalibrationController::new(CalibrationConfig::default(), FrameObserver::default(), store)
            .unwrap()
    }

    #[tokio::test]
    async fn test_focal_calibration_solves_fpx() {
        let store = Arc::new(MemoryStore::new());
        let mut ctrl = controller(store.clone());
        let mut source = limited_source(15, 200.0);

        let result = ctrl
            .run(
                CalibrationKind::Focal,
                &mut source,
                &ManualClock::new(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let expected = 200.0 * 30.0 / 1.17;
        assert_eq!(result.sample_count, 15);
        assert!((result.value - expected).abs() < 1e-6);
        assert!((ctrl.constants().f_px.unwrap() - expected).abs() < 1e-6);

        let stored: f64 = store.get(FOCAL_LENGTH_KEY).unwrap().unwrap().parse().unwrap();
        assert!((stored - expected).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_focal_calibration_stops_at_sample_cap() {
        let store = Arc::new(MemoryStore::new());
        let mut ctrl = controller(store);
        let clock = ManualClock::new();
        let mut source = limited_source(usize::MAX, 100.0);

        let result = ctrl
            .run(CalibrationKind::Focal, &mut source, &clock, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.sample_count, 20);
        assert_eq!(clock.elapsed(), Duration::from_millis(30 * 20));
    }

    #[tokio::test]
    async fn test_insufficient_samples_leaves_constants() {
        let store = Arc::new(MemoryStore::new());
        let mut ctrl = controller(store.clone());
        let mut source = limited_source(9, 200.0);

        let err = ctrl
            .run(
                CalibrationKind::Focal,
                &mut source,
                &ManualClock::new(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CalibrationError::InsufficientSamples {
                collected: 9,
                required: 10,
                ..
            }
        ));
        assert!(ctrl.constants().f_px.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_gated_frames_do_not_count() {
        let store = Arc::new(MemoryStore::new());
        let mut ctrl = controller(store);
        let mut source = || Some(iris_frame(100.0, 130.0));

        let err = ctrl
            .run(
                CalibrationKind::Focal,
                &mut source,
                &ManualClock::new(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CalibrationError::InsufficientSamples { collected: 0, .. }
        ));
    }

    #[tokio::test]
    async fn test_iris_requires_focal_length() {
        let store = Arc::new(MemoryStore::new());
        let mut ctrl = controller(store);
        let mut source = limited_source(20, 200.0);

        let err = ctrl
            .run(
                CalibrationKind::Iris,
                &mut source,
                &ManualClock::new(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CalibrationError::FocalLengthRequired));
    }

    #[tokio::test]
    async fn test_iris_calibration_solves_iris_cm() {
        let store = Arc::new(MemoryStore::with_entries([(FOCAL_LENGTH_KEY, "1000")]));
        let mut ctrl = controller(store.clone());
        let mut source = limited_source(20, 40.0);

        let result = ctrl
            .run(
                CalibrationKind::Iris,
                &mut source,
                &ManualClock::new(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!((result.value - 1.2).abs() < 1e-9);
        assert!(ctrl.constants().is_personalized());
        let stored: f64 = store.get(IRIS_DIAMETER_KEY).unwrap().unwrap().parse().unwrap();
        assert!((stored - 1.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_abort_discards_samples() {
        let store = Arc::new(MemoryStore::new());
        let mut ctrl = controller(store.clone());
        let abort = CancellationToken::new();
        let trigger = abort.clone();
        let mut served = 0;
        let mut source = move || {
            served += 1;
            if served == 12 {
                trigger.cancel();
            }
            Some(iris_frame(200.0, 200.0))
        };

        let err = ctrl
            .run(CalibrationKind::Focal, &mut source, &ManualClock::new(), &abort)
            .await
            .unwrap_err();

        assert!(matches!(err, CalibrationError::Aborted { collected: 12, .. }));
        assert!(ctrl.constants().f_px.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_reset_rewrites_store() {
        let store = Arc::new(MemoryStore::with_entries([
            (FOCAL_LENGTH_KEY, "900"),
            (IRIS_DIAMETER_KEY, "1.3"),
        ]));
        let mut ctrl = controller(store.clone());
        assert_eq!(ctrl.constants().f_px, Some(900.0));

        ctrl.reset().unwrap();

        assert!(ctrl.constants().f_px.is_none());
        assert_eq!(ctrl.constants().iris_cm, 1.17);
        assert!(store.get(FOCAL_LENGTH_KEY).unwrap().is_none());
        assert_eq!(store.get(IRIS_DIAMETER_KEY).unwrap().as_deref(), Some("1.17"));
    }
}
