//! Robust temporal smoothing for per-frame scalar measurements.
//!
//! # Module Structure
//!
//! - [`stats`] - Median and median absolute deviation helpers
//! - [`robust`] - `RobustStream`, a bounded median window with MAD outlier rejection
//!
//! # Rejection Rule
//!
//! ```text
//! window ≥ 5 values:
//!     m   = median(window)
//!     MAD = 1.4826 × median(|v − m|)
//!     reject x if |x − m| > k × max(MAD, 1.0)
//! ```

mod robust;
mod stats;

pub use robust::{RobustStream, StreamConfig, StreamOutcome, StreamUpdate};
pub use stats::{median, scaled_mad, MAD_SCALE};
