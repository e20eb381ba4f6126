//! Bounded-window median smoother with MAD outlier rejection.

use std::collections::VecDeque;

use super::stats::{median, scaled_mad};

/// Default window capacity.
pub const DEFAULT_WINDOW: usize = 21;

/// Default rejection multiplier.
pub const DEFAULT_REJECTION_K: f64 = 3.5;

/// Minimum history before outlier rejection engages.
pub const MIN_HISTORY_FOR_REJECTION: usize = 5;

/// Lower bound applied to the scaled MAD when computing the threshold.
///
/// Keeps the threshold positive when recent values are nearly identical.
pub const MAD_FLOOR: f64 = 1.0;

/// Tuning for a [`RobustStream`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamConfig {
    /// Maximum number of retained values.
    pub window: usize,

    /// Rejection multiplier applied to the (floored) scaled MAD.
    pub k: f64,

    /// Values required in the window before rejection is attempted.
    pub min_history: usize,

    /// Floor for the scaled MAD.
    pub mad_floor: f64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            k: DEFAULT_REJECTION_K,
            min_history: MIN_HISTORY_FOR_REJECTION,
            mad_floor: MAD_FLOOR,
        }
    }
}

/// What happened to a value passed to [`RobustStream::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The value was appended to the window.
    Accepted,
    /// The value was an outlier and was discarded.
    Rejected,
    /// No value was supplied.
    Missing,
}

impl StreamOutcome {
    /// Get a human-readable description.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamOutcome::Accepted => "accepted",
            StreamOutcome::Rejected => "rejected",
            StreamOutcome::Missing => "missing",
        }
    }
}

impl std::fmt::Display for StreamOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of feeding one value into a stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamUpdate {
    /// Current smoothed estimate after the update.
    pub estimate: Option<f64>,
    /// Whether the value was used.
    pub outcome: StreamOutcome,
}

/// Outlier-resistant temporal filter for a scalar signal.
///
/// Keeps the most recent `window` accepted values and reports their median.
/// Once at least `min_history` values are held, a new value further than
/// `k × max(MAD, mad_floor)` from the median is rejected without touching
/// the window.
///
/// # Usage
///
/// ```
/// use ipdmeter::stream::RobustStream;
///
/// let mut stream = RobustStream::with_defaults();
/// for _ in 0..5 {
///     stream.add(Some(100.0));
/// }
///
/// // A jump far beyond the threshold is held at the prior estimate
/// assert_eq!(stream.add(Some(150.0)), Some(100.0));
/// assert_eq!(stream.add(None), Some(100.0));
/// ```
#[derive(Debug, Clone)]
pub struct RobustStream {
    values: VecDeque<f64>,
    config: StreamConfig,
}

impl RobustStream {
    /// Create a new stream with the given configuration.
    ///
    /// A zero window is raised to one.
    pub fn new(config: StreamConfig) -> Self {
        let config = StreamConfig {
            window: config.window.max(1),
            ..config
        };
        Self {
            values: VecDeque::with_capacity(config.window + 1),
            config,
        }
    }

    /// Create with default configuration (window 21, k 3.5).
    pub fn with_defaults() -> Self {
        Self::new(StreamConfig::default())
    }

    /// Feed one value and return the current estimate.
    pub fn add(&mut self, value: Option<f64>) -> Option<f64> {
        self.observe(value).estimate
    }

    /// Feed one value and report whether it was used.
    ///
    /// Non-finite values count as missing.
    pub fn observe(&mut self, value: Option<f64>) -> StreamUpdate {
        let Some(x) = value.filter(|v| v.is_finite()) else {
            return self.update(StreamOutcome::Missing);
        };

        if self.is_outlier(x) {
            tracing::debug!(
                value = x,
                estimate = ?self.current(),
                window = self.values.len(),
                "Rejected outlier sample"
            );
            return self.update(StreamOutcome::Rejected);
        }

        self.values.push_back(x);
        while self.values.len() > self.config.window {
            self.values.pop_front();
        }

        self.update(StreamOutcome::Accepted)
    }

    /// Median of the current window, or `None` when empty.
    pub fn current(&self) -> Option<f64> {
        median(&self.values)
    }

    /// Empty the window.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of values in the window.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The stream configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    fn is_outlier(&self, x: f64) -> bool {
        if self.values.len() < self.config.min_history {
            return false;
        }
        let Some(m) = median(&self.values) else {
            return false;
        };
        let mad = scaled_mad(&self.values, m).unwrap_or(0.0);
        let threshold = self.config.k * mad.max(self.config.mad_floor);
        (x - m).abs() > threshold
    }

    fn update(&self, outcome: StreamOutcome) -> StreamUpdate {
        StreamUpdate {
            estimate: self.current(),
            outcome,
        }
    }
}

impl Default for RobustStream {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_stream_has_no_estimate() {
        let stream = RobustStream::with_defaults();
        assert!(stream.current().is_none());
        assert!(stream.is_empty());
    }

    #[test]
    fn test_missing_does_not_touch_window() {
        let mut stream = RobustStream::with_defaults();
        stream.add(Some(10.0));
        stream.add(Some(12.0));

        let update = stream.observe(None);
        assert_eq!(update.outcome, StreamOutcome::Missing);
        assert_eq!(update.estimate, Some(11.0));
        assert_eq!(stream.len(), 2);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let mut stream = RobustStream::with_defaults();
        stream.add(Some(4.0));
        let update = stream.observe(Some(f64::NAN));
        assert_eq!(update.outcome, StreamOutcome::Missing);
        assert_eq!(stream.len(), 1);
    }

    #[test]
    fn test_no_rejection_before_min_history() {
        let mut stream = RobustStream::with_defaults();
        for _ in 0..4 {
            stream.add(Some(100.0));
        }
        // Only 4 values held: the jump is accepted
        let update = stream.observe(Some(1000.0));
        assert_eq!(update.outcome, StreamOutcome::Accepted);
        assert_eq!(stream.len(), 5);
    }

    #[test]
    fn test_rejection_after_min_history() {
        let mut stream = RobustStream::with_defaults();
        for _ in 0..5 {
            stream.add(Some(100.0));
        }

        // MAD is 0, floored to 1.0 → threshold 3.5
        let update = stream.observe(Some(103.6));
        assert_eq!(update.outcome, StreamOutcome::Rejected);
        assert_eq!(update.estimate, Some(100.0));
        assert_eq!(stream.len(), 5);

        // Within threshold is accepted
        let update = stream.observe(Some(103.4));
        assert_eq!(update.outcome, StreamOutcome::Accepted);
        assert_eq!(stream.len(), 6);
    }

    #[test]
    fn test_threshold_scales_with_spread() {
        let mut stream = RobustStream::with_defaults();
        for v in [90.0, 95.0, 100.0, 105.0, 110.0] {
            stream.add(Some(v));
        }
        // median 100, deviations [10,5,0,5,10] → MAD 5 × 1.4826 = 7.413
        // threshold = 3.5 × 7.413 ≈ 25.9
        assert_eq!(stream.observe(Some(125.0)).outcome, StreamOutcome::Accepted);
        assert_eq!(stream.observe(Some(200.0)).outcome, StreamOutcome::Rejected);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let config = StreamConfig {
            window: 3,
            ..Default::default()
        };
        let mut stream = RobustStream::new(config);
        stream.add(Some(1.0));
        stream.add(Some(2.0));
        stream.add(Some(3.0));
        let estimate = stream.add(Some(4.0));

        assert_eq!(stream.len(), 3);
        assert_eq!(estimate, Some(3.0));
    }

    #[test]
    fn test_clear_resets_estimate() {
        let mut stream = RobustStream::with_defaults();
        for _ in 0..10 {
            stream.add(Some(42.0));
        }
        stream.clear();
        assert!(stream.current().is_none());

        // Fresh behavior: no rejection with an empty history
        assert_eq!(stream.add(Some(1000.0)), Some(1000.0));
    }

    #[test]
    fn test_zero_window_is_raised() {
        let stream = RobustStream::new(StreamConfig {
            window: 0,
            ..Default::default()
        });
        assert_eq!(stream.config().window, 1);
    }

    proptest! {
        #[test]
        fn prop_rejection_holds_estimate(v in -1000.0f64..1000.0, repeats in 5usize..30, delta in 3.51f64..500.0) {
            let mut stream = RobustStream::with_defaults();
            for _ in 0..repeats {
                stream.add(Some(v));
            }
            prop_assert_eq!(stream.add(Some(v + delta)), Some(v));
            prop_assert_eq!(stream.add(Some(v - delta)), Some(v));
        }

        #[test]
        fn prop_missing_never_changes_estimate(values in prop::collection::vec(-100.0f64..100.0, 0..40)) {
            let mut stream = RobustStream::with_defaults();
            for v in values {
                stream.add(Some(v));
            }
            let before = stream.current();
            prop_assert_eq!(stream.add(None), before);
            prop_assert_eq!(stream.current(), before);
        }

        #[test]
        fn prop_window_never_exceeds_capacity(
            values in prop::collection::vec(prop::option::of(-100.0f64..100.0), 0..100),
            window in 1usize..30,
        ) {
            let mut stream = RobustStream::new(StreamConfig { window, ..Default::default() });
            for v in values {
                stream.add(v);
                prop_assert!(stream.len() <= window);
            }
            stream.clear();
            prop_assert!(stream.current().is_none());
        }
    }
}
