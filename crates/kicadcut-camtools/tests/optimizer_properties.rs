use kicadcut_camtools::{compensate, PathOptimizer};
use kicadcut_core::{Point, Stroke};
use proptest::prelude::*;

fn rectangle(x: f64, y: f64, w: f64, h: f64) -> Stroke {
    Stroke::new(vec![
        Point::new(x, y),
        Point::new(x + w, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
    ])
}

fn grid_rectangles() -> impl Strategy<Value = Vec<Stroke>> {
    prop::collection::vec((0i32..6, 0i32..6, 1i32..3, 1i32..3), 1..12).prop_map(|cells| {
        cells
            .into_iter()
            .map(|(x, y, w, h)| rectangle(x as f64, y as f64, w as f64, h as f64))
            .collect()
    })
}

fn free_rectangles() -> impl Strategy<Value = Vec<Stroke>> {
    prop::collection::vec(
        (-500.0f64..500.0, -500.0f64..500.0, 0.1f64..20.0, 0.1f64..20.0),
        1..20,
    )
    .prop_map(|rects| {
        rects
            .into_iter()
            .map(|(x, y, w, h)| rectangle(x, y, w, h))
            .collect()
    })
}

#[test]
fn test_two_unit_squares_share_one_edge() {
    let strokes = vec![rectangle(0.0, 0.0, 1.0, 1.0), rectangle(1.0, 0.0, 1.0, 1.0)];
    assert_eq!(PathOptimizer::optimize(&strokes, (0.0, 0.0)).len(), 7);
}

#[test]
fn test_optimize_is_deterministic() {
    let strokes = vec![
        rectangle(3.0, 0.0, 1.0, 1.0),
        rectangle(0.0, 0.0, 1.0, 1.0),
        rectangle(1.0, 0.0, 1.0, 1.0),
    ];
    let first = PathOptimizer::optimize(&strokes, (0.0, 0.0));
    let second = PathOptimizer::optimize(&strokes, (0.0, 0.0));
    assert_eq!(first, second);
}

proptest! {
    #[test]
    fn justify_moves_min_corner_to_origin(strokes in free_rectangles(), angle in -3.2f64..3.2) {
        let strokes = PathOptimizer::justify(PathOptimizer::rotate_all(strokes, angle));
        let min_x = strokes.iter().flat_map(|s| s.points()).map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = strokes.iter().flat_map(|s| s.points()).map(|p| p.y).fold(f64::INFINITY, f64::min);
        prop_assert!(min_x.abs() < 1e-9);
        prop_assert!(min_y.abs() < 1e-9);

        let (max_x, max_y) = PathOptimizer::max_extent(&strokes);
        prop_assert!(max_x >= 0.0 && max_y >= 0.0);
    }

    #[test]
    fn optimize_twice_does_not_shrink_further(strokes in grid_rectangles()) {
        let once = PathOptimizer::optimize(&strokes, (0.0, 0.0));
        let as_strokes: Vec<Stroke> = once
            .iter()
            .map(|segment| Stroke::new(vec![segment.start, segment.end]))
            .collect();
        let twice = PathOptimizer::optimize(&as_strokes, (0.0, 0.0));
        prop_assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn optimize_never_exceeds_edge_count(strokes in grid_rectangles()) {
        let lines = PathOptimizer::optimize(&strokes, (0.0, 0.0));
        prop_assert!(lines.len() <= strokes.len() * 4);
        prop_assert!(lines.len() >= 4);
    }

    #[test]
    fn compensation_zero_is_identity(
        x1 in -1e3f64..1e3, y1 in -1e3f64..1e3, x2 in -1e3f64..1e3, y2 in -1e3f64..1e3,
    ) {
        prop_assert_eq!(compensate(x1, y1, x2, y2, 0.0), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn compensation_depends_on_direction_only(
        x1 in -1e3f64..1e3, y1 in -1e3f64..1e3, x2 in -1e3f64..1e3, y2 in -1e3f64..1e3,
        distance in 0.001f64..2.0,
    ) {
        prop_assume!((x2 - x1).hypot(y2 - y1) > 1e-6);
        let (sx, sy, ex, ey) = compensate(x1, y1, x2, y2, distance);
        let (rsx, rsy, rex, rey) = compensate(x2, y2, x1, y1, distance);
        prop_assert!((rsx - ex).abs() < 1e-9 && (rsy - ey).abs() < 1e-9);
        prop_assert!((rex - sx).abs() < 1e-9 && (rey - sy).abs() < 1e-9);
        prop_assert!((rsx + sx).abs() < 1e-9 && (rsy + sy).abs() < 1e-9);
    }
}
