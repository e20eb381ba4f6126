//! Per-frame iris observation.
//!
//! Converts one frame of normalized face landmarks into per-eye iris
//! circles, the center-to-center pixel distance, and a bilateral
//! consistency verdict on the iris diameter.
//!
//! # Flow
//!
//! ```text
//! LandmarkFrame (normalized)
//!     │
//!     ├──► left ring  (4 points) ──► CircleFitter ──► left iris circle  ─┐
//!     │                                                                 ├──► ipd_px
//!     └──► right ring (4 points) ──► CircleFitter ──► right iris circle ─┘
//!                                                                        │
//!                                              diameter ratio gate ◄─────┘
//!                                                    │
//!                                  Accepted(mean) | Gated(ratio) | Degenerate
//! ```

mod landmarks;
mod observer;
pub mod recording;
mod types;

pub use landmarks::{indices, LandmarkFrame};
pub use observer::{FrameObserver, DEFAULT_GATE_RATIO};
pub use recording::{read_recording, write_frame, RecordedFrame, RecordingError};
pub use types::{FrameObservation, IrisSample};
