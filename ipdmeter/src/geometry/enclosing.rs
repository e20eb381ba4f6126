//! Minimum enclosing circle for small, fixed-size point sets.
//!
//! Iris boundary rings arrive as four landmarks per eye, so the fitter
//! enumerates every 2-point and 3-point support set instead of running a
//! randomized linear-time algorithm.
//!
//! # Algorithm
//!
//! ```text
//! pairs   ──► diameter circle ──┐
//!                               ├──► keep smallest circle containing all points (±ε)
//! triples ──► circumcircle ─────┘
//!                               │
//!             none survived ────┴──► centroid + mean distance fallback
//! ```

use super::point::{Circle, Point2D};

/// Containment tolerance for candidate circles (pixels).
pub const DEFAULT_FIT_TOLERANCE_PX: f64 = 1e-3;

/// Minimum magnitude of the circumcircle denominator.
///
/// Triples below this are treated as collinear and skipped.
pub const COLLINEAR_EPSILON: f64 = 1e-6;

/// Computes the minimum enclosing circle of a small point set.
///
/// Complexity is O(N³) in the number of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleFitter {
    /// A candidate contains a point if the point lies within `radius + tolerance`.
    pub tolerance: f64,
    /// Collinearity threshold for the triple stage.
    pub collinear_epsilon: f64,
}

impl Default for CircleFitter {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_FIT_TOLERANCE_PX,
            collinear_epsilon: COLLINEAR_EPSILON,
        }
    }
}

impl CircleFitter {
    /// Create a fitter with the given containment tolerance.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Default::default()
        }
    }

    /// Fit the smallest circle containing every point.
    ///
    /// Always returns a finite circle for finite input. An empty set yields
    /// the zero circle at the origin.
    pub fn fit(&self, points: &[Point2D]) -> Circle {
        let n = points.len();
        let mut best: Option<Circle> = None;

        for i in 0..n {
            for j in (i + 1)..n {
                let candidate = Circle::from_diameter(&points[i], &points[j]);
                self.consider(candidate, points, &mut best);
            }
        }

        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    let Some(candidate) = Circle::circumscribed(
                        &points[i],
                        &points[j],
                        &points[k],
                        self.collinear_epsilon,
                    ) else {
                        continue;
                    };
                    self.consider(candidate, points, &mut best);
                }
            }
        }

        best.unwrap_or_else(|| Self::centroid_fallback(points))
    }

    fn consider(&self, candidate: Circle, points: &[Point2D], best: &mut Option<Circle>) {
        if !candidate.radius.is_finite() {
            return;
        }
        if !points.iter().all(|p| candidate.contains(p, self.tolerance)) {
            return;
        }
        match best {
            Some(current) if current.radius <= candidate.radius => {}
            _ => *best = Some(candidate),
        }
    }

    /// Centroid with mean centroid distance as radius.
    fn centroid_fallback(points: &[Point2D]) -> Circle {
        let Some(center) = Point2D::centroid(points) else {
            return Circle::default();
        };
        let mean_distance =
            points.iter().map(|p| p.distance_to(&center)).sum::<f64>() / points.len() as f64;
        Circle::new(center, mean_distance)
    }
}
