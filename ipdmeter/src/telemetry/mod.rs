//! Processing-rate telemetry.
//!
//! The meter records one timestamp per processed frame and reports the
//! rate over the most recent frames.
//!
//! ```text
//! process_frame ─────► FrameRateMeter ─────► fps()
//!                      (last 60 stamps)      (n − 1) / span
//! ```

mod frame_rate;

pub use frame_rate::{FrameRateMeter, DEFAULT_RATE_WINDOW};
