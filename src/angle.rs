//! Joint angle from three 2-D landmarks
//!
//! The angle at `mid` is the difference of the two arm directions,
//! folded into the convex range so the result is always in [0, 180]
//! regardless of the points' rotational order.

/// Normalized image coordinates, both axes in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Angle at `mid` formed by `start`-`mid`-`end`, in degrees.
///
/// Degenerate arms (a point equal to `mid`) are not special-cased:
/// `atan2(0, 0)` is 0, so the result is still finite and in range.
pub fn angle(start: Point2D, mid: Point2D, end: Point2D) -> f64 {
    let radians = (end.y - mid.y).atan2(end.x - mid.x) - (start.y - mid.y).atan2(start.x - mid.x);
    let degrees = radians.to_degrees().abs();

    if degrees > 180.0 {
        360.0 - degrees
    } else {
        degrees
    }
}
