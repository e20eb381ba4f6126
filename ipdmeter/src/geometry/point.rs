//! Point and circle value types in pixel space.

use serde::{Deserialize, Serialize};

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal coordinate (pixels, increasing to the right).
    pub x: f64,
    /// Vertical coordinate (pixels, increasing downward).
    pub y: f64,
}

impl Point2D {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between this point and another.
    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Centroid of a point set, or `None` when the set is empty.
    pub fn centroid(points: &[Point2D]) -> Option<Point2D> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point2D::new(sx / n, sy / n))
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::fmt::Display for Point2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// A circle in pixel space.
///
/// The radius is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    /// Circle center.
    pub center: Point2D,
    /// Circle radius (pixels).
    pub radius: f64,
}

impl Circle {
    /// Create a new circle. Negative radii are clamped to zero.
    pub fn new(center: Point2D, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Circle having the segment `a`-`b` as its diameter.
    pub fn from_diameter(a: &Point2D, b: &Point2D) -> Self {
        Self::new(a.midpoint(b), a.distance_to(b) / 2.0)
    }

    /// Circumscribed circle of a triangle.
    ///
    /// Returns `None` when the denominator of the perpendicular-bisector
    /// intersection is smaller than `epsilon` in magnitude.
    pub fn circumscribed(a: &Point2D, b: &Point2D, c: &Point2D, epsilon: f64) -> Option<Self> {
        let ab_x = b.x - a.x;
        let ab_y = b.y - a.y;
        let ac_x = c.x - a.x;
        let ac_y = c.y - a.y;
        let e = ab_x * (a.x + b.x) + ab_y * (a.y + b.y);
        let f = ac_x * (a.x + c.x) + ac_y * (a.y + c.y);
        let g = 2.0 * (ab_x * (c.y - b.y) - ab_y * (c.x - b.x));

        if g.abs() < epsilon {
            return None;
        }

        let center = Point2D::new((ac_y * e - ab_y * f) / g, (ab_x * f - ac_x * e) / g);
        Some(Self::new(center, center.distance_to(a)))
    }

    /// Circle diameter (pixels).
    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    /// Whether `point` lies inside the circle, allowing `tolerance` beyond the radius.
    pub fn contains(&self, point: &Point2D, tolerance: f64) -> bool {
        self.center.distance_to(point) <= self.radius + tolerance
    }
}
