//! Geometry kernel
//!
//! Points, strokes and line segments in millimetres plus the two affine
//! operations every stage relies on: rotation about a point and the plotter
//! transform (linear map, offset, unit scale).

use crate::error::GeometryError;
use crate::units::DEVICE_UNITS_PER_MM;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin (0, 0)
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Translate by `(dx, dy)`
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to `other`
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Rotate `point` counter-clockwise by `angle` radians around `origin`
pub fn rotate(point: Point, origin: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let px = point.x - origin.x;
    let py = point.y - origin.y;
    Point::new(
        origin.x + cos * px - sin * py,
        origin.y + sin * px + cos * py,
    )
}

/// One atomic cut motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Where the blade enters the material
    pub start: Point,
    /// Where the blade leaves the material
    pub end: Point,
}

impl LineSegment {
    /// Create a segment from two points
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Segment length in mm
    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    /// Endpoints as a flat `(x1, y1, x2, y2)` tuple
    pub fn coords(&self) -> (f64, f64, f64, f64) {
        (self.start.x, self.start.y, self.end.x, self.end.y)
    }
}

/// A closed polygon, typically the outline of one pad
///
/// The closing edge from the last point back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Create a stroke from its vertices
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Vertices in order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consume the stroke and return its vertices
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the stroke has no vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Boundary edges in polygon order
    ///
    /// Three or more points yield the closed ring, two points a single
    /// segment, anything shorter nothing.
    pub fn edges(&self) -> Vec<LineSegment> {
        match self.points.len() {
            0 | 1 => Vec::new(),
            2 => vec![LineSegment::new(self.points[0], self.points[1])],
            n => (0..n)
                .map(|i| LineSegment::new(self.points[i], self.points[(i + 1) % n]))
                .collect(),
        }
    }

    /// Apply `f` to every vertex
    pub fn map(self, f: impl Fn(Point) -> Point) -> Self {
        Self::new(self.points.into_iter().map(f).collect())
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Plotter coordinate transform
///
/// `matrix` is the row-major linear map `[a, b, c, d]`; `offset` is given in
/// millimetres (pre-scale) and `scale` converts millimetres to device units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: [f64; 4],
    offset: Point,
    scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: [1.0, 0.0, 0.0, 1.0],
            offset: Point::origin(),
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Create a transform, rejecting non-positive scales
    pub fn new(matrix: [f64; 4], offset: Point, scale: f64) -> Result<Self, GeometryError> {
        if scale.is_nan() || scale <= 0.0 {
            return Err(GeometryError::InvalidScale { scale });
        }
        Ok(Self {
            matrix,
            offset,
            scale,
        })
    }

    /// Identity map at the Graphtec device scale
    pub fn device() -> Self {
        Self {
            scale: DEVICE_UNITS_PER_MM,
            ..Self::default()
        }
    }

    /// Linear map
    pub fn matrix(&self) -> [f64; 4] {
        self.matrix
    }

    /// Translation in millimetres
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Device units per millimetre
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Replace the linear map
    pub fn with_matrix(mut self, matrix: [f64; 4]) -> Self {
        self.matrix = matrix;
        self
    }

    /// Replace the translation
    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Apply linear map, then offset, then scale
    pub fn apply(&self, point: Point) -> Point {
        let [a, b, c, d] = self.matrix;
        let tx = a * point.x + b * point.y + self.offset.x;
        let ty = c * point.x + d * point.y + self.offset.y;
        Point::new(tx * self.scale, ty * self.scale)
    }
}
