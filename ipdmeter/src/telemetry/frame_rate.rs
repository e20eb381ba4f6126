//! Rolling frames-per-second meter.

use std::collections::VecDeque;
use std::time::Instant;

/// Number of frame timestamps kept for the rate calculation.
pub const DEFAULT_RATE_WINDOW: usize = 60;

/// Rolling processing-rate meter.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    /// Most recent frame timestamps, oldest first.
    stamps: VecDeque<Instant>,

    /// Maximum timestamps to keep.
    capacity: usize,

    /// Frames recorded since creation.
    total: u64,
}

impl Default for FrameRateMeter {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_WINDOW)
    }
}

impl FrameRateMeter {
    /// Create a meter keeping `capacity` timestamps (at least 2).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            stamps: VecDeque::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    /// Record a processed frame.
    pub fn record(&mut self, at: Instant) {
        self.stamps.push_back(at);
        while self.stamps.len() > self.capacity {
            self.stamps.pop_front();
        }
        self.total += 1;
    }

    /// Frames per second over the window; 0 with fewer than two frames.
    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.stamps.front(), self.stamps.back()) else {
            return 0.0;
        };
        let span = last.saturating_duration_since(*first).as_secs_f64();
        if self.stamps.len() < 2 || span <= 0.0 {
            return 0.0;
        }
        (self.stamps.len() - 1) as f64 / span
    }

    /// Frames recorded since creation.
    pub fn total_frames(&self) -> u64 {
        self.total
    }
}
