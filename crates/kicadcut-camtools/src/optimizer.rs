//! Cut path optimizer
//!
//! Rotates and justifies the pad strokes and reduces them to a flat list of
//! line segments in which every shared pad edge is cut only once.

use kicadcut_core::{rotate, LineSegment, Point, Stroke};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Endpoint grid used for edge identity, in millimetres
const EDGE_QUANTUM: f64 = 1e-6;

type GridPoint = (i64, i64);

/// Direction-independent identity of an edge.
///
/// Both endpoints are snapped to the [`EDGE_QUANTUM`] grid and sorted
/// lexicographically, so `a -> b` and `b -> a` produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey(GridPoint, GridPoint);

impl EdgeKey {
    pub fn new(segment: &LineSegment) -> Self {
        let a = snap(segment.start);
        let b = snap(segment.end);
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// True if both endpoints fall onto the same grid cell
    pub fn is_degenerate(&self) -> bool {
        self.0 == self.1
    }
}

fn snap(point: Point) -> GridPoint {
    (
        (point.x / EDGE_QUANTUM).round() as i64,
        (point.y / EDGE_QUANTUM).round() as i64,
    )
}

/// Stroke set optimization
#[derive(Debug)]
pub struct PathOptimizer;

impl PathOptimizer {
    /// Rotate every stroke about the origin by `angle` radians
    pub fn rotate_all(strokes: Vec<Stroke>, angle: f64) -> Vec<Stroke> {
        if angle == 0.0 {
            return strokes;
        }
        let origin = Point::origin();
        strokes
            .into_iter()
            .map(|stroke| stroke.map(|p| rotate(p, origin, angle)))
            .collect()
    }

    /// Translate all strokes so the smallest x and smallest y become zero
    pub fn justify(strokes: Vec<Stroke>) -> Vec<Stroke> {
        let Some((min_x, min_y)) = Self::min_corner(&strokes) else {
            return strokes;
        };
        strokes
            .into_iter()
            .map(|stroke| stroke.map(|p| p.offset(-min_x, -min_y)))
            .collect()
    }

    /// Upper corner of the bounding box, `(0, 0)` for an empty set
    pub fn max_extent(strokes: &[Stroke]) -> (f64, f64) {
        let mut points = strokes.iter().flat_map(|s| s.points().iter());
        let Some(first) = points.next() else {
            return (0.0, 0.0);
        };
        points.fold((first.x, first.y), |(mx, my), p| (mx.max(p.x), my.max(p.y)))
    }

    fn min_corner(strokes: &[Stroke]) -> Option<(f64, f64)> {
        let mut points = strokes.iter().flat_map(|s| s.points().iter());
        let first = points.next()?;
        Some(points.fold((first.x, first.y), |(mx, my), p| (mx.min(p.x), my.min(p.y))))
    }

    /// Rectangle surrounding the justified design at `border` distance
    pub fn border_path(extent: (f64, f64), border: (f64, f64)) -> Stroke {
        let (max_x, max_y) = extent;
        let (bx, by) = border;
        Stroke::new(vec![
            Point::new(-bx, -by),
            Point::new(max_x + bx, -by),
            Point::new(max_x + bx, max_y + by),
            Point::new(-bx, max_y + by),
        ])
    }

    /// Reduce strokes to the segments that must be cut.
    ///
    /// Coincident edges collapse to the first occurrence in visit order and
    /// zero-length edges are dropped. Strokes are visited greedily, always
    /// choosing the unvisited stroke whose first vertex is closest to the
    /// current pen position (lowest index on ties), starting at the origin.
    /// The border rectangle is cut separately and never merged here.
    pub fn optimize(strokes: &[Stroke], _border: (f64, f64)) -> Vec<LineSegment> {
        if strokes.is_empty() {
            return Vec::new();
        }

        let edges: Vec<Vec<LineSegment>> = strokes.iter().map(Stroke::edges).collect();

        let mut multiplicity: HashMap<EdgeKey, usize> = HashMap::new();
        for segment in edges.iter().flatten() {
            *multiplicity.entry(EdgeKey::new(segment)).or_insert(0) += 1;
        }

        let mut emitted: HashSet<EdgeKey> = HashSet::with_capacity(multiplicity.len());
        let mut lines = Vec::with_capacity(multiplicity.len());

        for index in Self::visit_order(strokes) {
            for segment in &edges[index] {
                let key = EdgeKey::new(segment);
                if key.is_degenerate() {
                    continue;
                }
                if emitted.insert(key) {
                    lines.push(*segment);
                }
            }
        }

        let total: usize = multiplicity.values().sum();
        let shared = multiplicity.values().filter(|&&count| count > 1).count();
        debug!(
            strokes = strokes.len(),
            edges = total,
            shared,
            lines = lines.len(),
            "Optimized cut paths"
        );
        lines
    }

    fn visit_order(strokes: &[Stroke]) -> Vec<usize> {
        let mut remaining: Vec<usize> = (0..strokes.len())
            .filter(|&i| !strokes[i].is_empty())
            .collect();
        let mut order = Vec::with_capacity(remaining.len());
        let mut pen = Point::origin();

        while !remaining.is_empty() {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (slot, &index) in remaining.iter().enumerate() {
                let distance = pen.distance_to(strokes[index].points()[0]);
                if distance < best_distance {
                    best = slot;
                    best_distance = distance;
                }
            }

            let index = remaining.remove(best);
            let stroke = &strokes[index];
            pen = stroke
                .edges()
                .last()
                .map(|segment| segment.end)
                .unwrap_or(stroke.points()[0]);
            order.push(index);
        }

        order
    }
}
