//! Landmark frames and iris ring indices.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// Face mesh landmark indices used by the measurement pipeline.
///
/// The mesh extends the 468 base landmarks with five points per iris; the
/// first four of each group form the ring the circle is fitted to.
pub mod indices {
    /// Left iris ring.
    pub const LEFT_IRIS_RING: [usize; 4] = [468, 469, 470, 471];
    /// Right iris ring.
    pub const RIGHT_IRIS_RING: [usize; 4] = [473, 474, 475, 476];
    /// Number of landmarks a frame must carry to resolve both rings.
    pub const REQUIRED_LANDMARKS: usize = 477;
}

/// One frame of landmark detector output.
///
/// Landmark coordinates are normalized to `[0, 1]` in each axis and are
/// projected to pixels with the frame dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Normalized `[x, y]` landmark coordinates, indexed by the mesh scheme.
    pub landmarks: Vec<[f64; 2]>,
}

impl LandmarkFrame {
    /// Create a new frame.
    pub fn new(width: u32, height: u32, landmarks: Vec<[f64; 2]>) -> Self {
        Self {
            width,
            height,
            landmarks,
        }
    }

    /// Whether the frame can produce an observation.
    pub fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0 && self.landmarks.len() >= indices::REQUIRED_LANDMARKS
    }

    /// Project one landmark to pixel coordinates.
    pub fn pixel(&self, index: usize) -> Option<Point2D> {
        let [x, y] = *self.landmarks.get(index)?;
        let point = Point2D::new(x * self.width as f64, y * self.height as f64);
        point.is_finite().then_some(point)
    }

    /// Project a fixed group of landmarks to pixel coordinates.
    ///
    /// Returns `None` if any index is out of range or non-finite.
    pub fn pixels<const N: usize>(&self, group: &[usize; N]) -> Option<[Point2D; N]> {
        let mut points = [Point2D::default(); N];
        for (slot, &index) in points.iter_mut().zip(group.iter()) {
            *slot = self.pixel(index)?;
        }
        Some(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_projection() {
        let mut landmarks = vec![[0.0, 0.0]; indices::REQUIRED_LANDMARKS];
        landmarks[indices::LEFT_IRIS_RING[0]] = [0.25, 0.5];
        let frame = LandmarkFrame::new(1280, 720, landmarks);

        let p = frame.pixel(indices::LEFT_IRIS_RING[0]).unwrap();
        assert_eq!(p, Point2D::new(320.0, 360.0));
    }

    #[test]
    fn test_short_frame_is_unusable() {
        let frame = LandmarkFrame::new(640, 480, vec![[0.5, 0.5]; 468]);
        assert!(!frame.is_usable());
        assert!(frame.pixels(&indices::LEFT_IRIS_RING).is_none());
    }

    #[test]
    fn test_zero_size_frame_is_unusable() {
        let frame = LandmarkFrame::new(0, 480, vec![[0.5, 0.5]; indices::REQUIRED_LANDMARKS]);
        assert!(!frame.is_usable());
    }

    #[test]
    fn test_non_finite_landmark_rejected() {
        let mut landmarks = vec![[0.5, 0.5]; indices::REQUIRED_LANDMARKS];
        landmarks[470] = [f64::NAN, 0.5];
        let frame = LandmarkFrame::new(640, 480, landmarks);
        assert!(frame.pixels(&indices::LEFT_IRIS_RING).is_none());
        assert!(frame.pixels(&indices::RIGHT_IRIS_RING).is_some());
    }

    #[test]
    fn test_deserialize_frame() {
        let frame: LandmarkFrame =
            serde_json::from_str(r#"{"width": 4, "height": 2, "landmarks": [[0.5, 0.5]]}"#)
                .unwrap();
        assert_eq!(frame.pixel(0), Some(Point2D::new(2.0, 1.0)));
    }
}
