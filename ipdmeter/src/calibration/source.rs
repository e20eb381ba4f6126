//! Frame sources polled by calibration sessions.

use std::collections::VecDeque;

use crate::observation::LandmarkFrame;

/// Supplies the most recent landmark frame on demand.
///
/// `None` means no face was detected at poll time.
pub trait FrameSource: Send {
    /// Poll for the next frame.
    fn next_frame(&mut self) -> Option<LandmarkFrame>;
}

impl<F> FrameSource for F
where
    F: FnMut() -> Option<LandmarkFrame> + Send,
{
    fn next_frame(&mut self) -> Option<LandmarkFrame> {
        self()
    }
}

/// Replays a recorded sequence of frames.
///
/// Once exhausted it keeps returning `None`, or restarts from the first
/// frame when looping is enabled.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    frames: Vec<Option<LandmarkFrame>>,
    pending: VecDeque<usize>,
    looping: bool,
}

impl ReplaySource {
    /// Create a source that plays `frames` once.
    pub fn new(frames: Vec<Option<LandmarkFrame>>) -> Self {
        let pending = (0..frames.len()).collect();
        Self {
            frames,
            pending,
            looping: false,
        }
    }

    /// Restart from the beginning when the recording runs out.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Frames not yet played in the current pass.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> Option<LandmarkFrame> {
        if self.pending.is_empty() && self.looping {
            self.pending.extend(0..self.frames.len());
        }
        let index = self.pending.pop_front()?;
        self.frames.get(index).cloned().flatten()
    }
}
