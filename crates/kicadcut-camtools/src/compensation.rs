//! Blade drag compensation
//!
//! A drag knife trails behind the tool centre, so every cut is extended by a
//! fixed distance past both of its endpoints along its own direction.

use kicadcut_core::{LineSegment, Point};

/// Endpoint offsets `(dx1, dy1, dx2, dy2)` for the segment `(x1, y1) -> (x2, y2)`.
///
/// The start moves back and the end moves forward by `distance`.
pub fn compensate(x1: f64, y1: f64, x2: f64, y2: f64, distance: f64) -> (f64, f64, f64, f64) {
    if distance == 0.0 {
        return (0.0, 0.0, 0.0, 0.0);
    }
    let (sin, cos) = (y2 - y1).atan2(x2 - x1).sin_cos();
    (-distance * cos, -distance * sin, distance * cos, distance * sin)
}

/// The segment with [`compensate`] applied to its endpoints
pub fn compensate_segment(segment: &LineSegment, distance: f64) -> LineSegment {
    let (x1, y1, x2, y2) = segment.coords();
    let (dx1, dy1, dx2, dy2) = compensate(x1, y1, x2, y2, distance);
    LineSegment::new(Point::new(x1 + dx1, y1 + dy1), Point::new(x2 + dx2, y2 + dy2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_horizontal_segment() {
        let (dx1, dy1, dx2, dy2) = compensate(0.0, 0.0, 10.0, 0.0, 0.5);
        assert_relative_eq!(dx1, -0.5);
        assert_relative_eq!(dy1, 0.0);
        assert_relative_eq!(dx2, 0.5);
        assert_relative_eq!(dy2, 0.0);
    }

    #[test]
    fn test_diagonal_segment_keeps_length_increment() {
        let segment = LineSegment::new(Point::new(1.0, 1.0), Point::new(4.0, 5.0));
        let compensated = compensate_segment(&segment, 0.25);
        assert_relative_eq!(compensated.length(), segment.length() + 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_distance_is_identity() {
        let segment = LineSegment::new(Point::new(1.0, 2.0), Point::new(-3.0, 7.5));
        assert_eq!(compensate_segment(&segment, 0.0), segment);
    }
}
