//! Planar geometry for iris ring fitting.
//!
//! # Module Structure
//!
//! - [`point`] - `Point2D` and `Circle` value types
//! - [`enclosing`] - `CircleFitter`, the minimum enclosing circle for small point sets

mod enclosing;
mod point;

pub use enclosing::{CircleFitter, COLLINEAR_EPSILON, DEFAULT_FIT_TOLERANCE_PX};
pub use point::{Circle, Point2D};
