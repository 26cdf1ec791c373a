//! Planar geometry primitives in millimeters.
//!
//! Every coordinate that ends up in the pattern IR passes through [`round_mm`],
//! which keeps generated output stable at 0.01mm resolution.

use serde::{Deserialize, Serialize};

/// Round to two decimals (0.01mm), normalizing negative zero.
pub fn round_mm(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Build a point, rounding both coordinates to 0.01mm.
    pub fn mm(x: f64, y: f64) -> Self {
        Self {
            x: round_mm(x),
            y: round_mm(y),
        }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Translated copy, rounded.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::mm(self.x + dx, self.y + dy)
    }
}

/// Sum of segment lengths along an open polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box enclosing `points`. An empty iterator yields a zero box at the origin.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            };
        };

        let mut bb = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in iter {
            bb.min_x = bb.min_x.min(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_x = bb.max_x.max(p.x);
            bb.max_y = bb.max_y.max(p.y);
        }

        Self {
            min_x: round_mm(bb.min_x),
            min_y: round_mm(bb.min_y),
            max_x: round_mm(bb.max_x),
            max_y: round_mm(bb.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Endpoints of a tick of `length` centred on `position`, oriented at `angle_deg`.
pub fn tick_endpoints(position: Point, angle_deg: f64, length: f64) -> (Point, Point) {
    let half = length / 2.0;
    let rad = angle_deg.to_radians();
    let dx = round_mm(half * rad.cos());
    let dy = round_mm(half * rad.sin());
    (
        Point::mm(position.x - dx, position.y - dy),
        Point::mm(position.x + dx, position.y + dy),
    )
}

/// The two back corners of an arrowhead whose tip is `tip`, pointing away from `tail`.
pub fn arrowhead(tail: Point, tip: Point, size: f64) -> (Point, Point) {
    let angle = (tip.y - tail.y).atan2(tip.x - tail.x);
    (
        Point::mm(
            tip.x - size * (angle - 0.4).cos(),
            tip.y - size * (angle - 0.4).sin(),
        ),
        Point::mm(
            tip.x - size * (angle + 0.4).cos(),
            tip.y - size * (angle + 0.4).sin(),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_mm_two_decimals() {
        assert_eq!(round_mm(239.199999), 239.2);
        assert_eq!(round_mm(1.005 * 1000.0), 1005.0);
        assert_eq!(round_mm(-0.001), 0.0);
        assert!(round_mm(-0.001).is_sign_positive());
    }

    #[test]
    fn test_polyline_length() {
        let pts = [Point::mm(0.0, 0.0), Point::mm(3.0, 4.0), Point::mm(3.0, 10.0)];
        assert!((polyline_length(&pts) - 11.0).abs() < 1e-9);
        assert_eq!(polyline_length(&pts[..1]), 0.0);
    }

    #[test]
    fn test_bounding_box() {
        let pts = [Point::mm(-10.0, 5.0), Point::mm(20.0, -3.0), Point::mm(4.0, 40.0)];
        let bb = BoundingBox::from_points(&pts);
        assert_eq!(bb.min_x, -10.0);
        assert_eq!(bb.min_y, -3.0);
        assert_eq!(bb.max_x, 20.0);
        assert_eq!(bb.max_y, 40.0);
        assert_eq!(bb.area(), 30.0 * 43.0);
    }

    #[test]
    fn test_tick_is_centred() {
        let (a, b) = tick_endpoints(Point::mm(10.0, 10.0), 90.0, 8.0);
        assert_eq!(a, Point::mm(10.0, 6.0));
        assert_eq!(b, Point::mm(10.0, 14.0));
    }
}
