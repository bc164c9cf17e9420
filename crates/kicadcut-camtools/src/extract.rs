//! Stroke extraction
//!
//! Turns the SMD pads of one layer into closed rectangular strokes in board
//! coordinates, applying shrink and the footprint/pad rotation.

use crate::board::{Board, Footprint, Pad, PadType};
use crate::error::{CamToolError, CamToolResult, ParameterError};
use crate::filter::ReferenceFilter;
use kicadcut_core::{rotate, BoardError, Point, Stroke};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info};

/// Parameters for pad extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractParameters {
    /// Copper or paste layer to cut (e.g. `F.Paste`)
    pub layer: String,
    /// Amount subtracted from each pad dimension (mm)
    pub shrink_abs: f64,
    /// Fraction of each pad dimension subtracted, 0.0..1.0
    pub shrink_rel: f64,
    /// Reference designator globs; empty means every footprint
    pub filters: Vec<String>,
}

impl Default for ExtractParameters {
    fn default() -> Self {
        Self {
            layer: "F.Paste".to_string(),
            shrink_abs: 0.05,
            shrink_rel: 0.0,
            filters: Vec::new(),
        }
    }
}

impl ExtractParameters {
    pub fn validate(&self) -> CamToolResult<()> {
        if self.layer.trim().is_empty() {
            return Err(CamToolError::InvalidParameters(
                "layer must not be empty".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.shrink_rel) {
            return Err(ParameterError::OutOfRange {
                name: "shrink_rel".to_string(),
                value: self.shrink_rel,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        Ok(())
    }
}

/// Outline of one pad after shrink, rotated into board space.
///
/// Returns `None` when shrinking leaves no positive width or height.
pub fn pad_stroke(footprint: &Footprint, pad: &Pad, shrink_abs: f64, shrink_rel: f64) -> Option<Stroke> {
    let width = pad.width - shrink_abs - pad.width * shrink_rel;
    let height = pad.height - shrink_abs - pad.height * shrink_rel;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let footprint_center = footprint.at.point();
    let footprint_angle = footprint.at.rotation.to_radians();
    let pad_angle = pad.at.rotation.to_radians() - PI;
    let center = footprint_center.offset(pad.at.x, pad.at.y);

    let (hw, hh) = (width / 2.0, height / 2.0);
    let top_left = center.offset(-hw, -hh);
    let top_right = center.offset(hw, -hh);
    let bottom_right = center.offset(hw, hh);
    let bottom_left = center.offset(-hw, hh);

    let corners = [top_left, top_right, bottom_right, bottom_left]
        .into_iter()
        .map(|corner| rotate(corner, center, footprint_angle - pad_angle))
        .map(|corner| rotate(corner, footprint_center, -footprint_angle))
        .collect::<Vec<Point>>();

    Some(Stroke::new(corners))
}

/// Extracts pad strokes from a board
pub struct StrokeExtractor {
    params: ExtractParameters,
    filter: ReferenceFilter,
}

impl StrokeExtractor {
    /// Validate parameters and compile the reference filter
    pub fn new(params: ExtractParameters) -> CamToolResult<Self> {
        params.validate()?;
        let filter = ReferenceFilter::new(&params.filters)?;
        Ok(Self { params, filter })
    }

    pub fn params(&self) -> &ExtractParameters {
        &self.params
    }

    /// Collect one stroke per qualifying pad, in board order.
    ///
    /// An empty result is not an error; the caller decides whether nothing to
    /// cut is fatal.
    pub fn extract(&self, board: &Board) -> CamToolResult<Vec<Stroke>> {
        let layer = self.params.layer.as_str();
        if !board.has_layer(layer) {
            return Err(BoardError::UnknownLayer {
                layer: layer.to_string(),
            }
            .into());
        }

        let mut strokes = Vec::new();
        let mut skipped = 0usize;

        for footprint in &board.footprints {
            if !self.filter.accepts(footprint.reference.as_deref()) {
                debug!(
                    reference = footprint.reference.as_deref().unwrap_or("<none>"),
                    "Footprint excluded by filter"
                );
                continue;
            }

            for pad in footprint
                .pads
                .iter()
                .filter(|pad| pad.pad_type == PadType::Smd && pad.on_layer(layer))
            {
                match pad_stroke(footprint, pad, self.params.shrink_abs, self.params.shrink_rel) {
                    Some(stroke) => strokes.push(stroke),
                    None => {
                        skipped += 1;
                        debug!(
                            reference = footprint.reference.as_deref().unwrap_or("<none>"),
                            pad = %pad.number,
                            "Pad shrinks to nothing, skipped"
                        );
                    }
                }
            }
        }

        info!(
            "Extracted {} pad strokes on {} ({} degenerate)",
            strokes.len(),
            layer,
            skipped
        );
        Ok(strokes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Placement;
    use approx::assert_relative_eq;

    fn smd(x: f64, y: f64, rotation: f64, w: f64, h: f64) -> Pad {
        Pad {
            number: "1".to_string(),
            pad_type: PadType::Smd,
            shape: "rect".to_string(),
            at: Placement::new(x, y, rotation),
            width: w,
            height: h,
            layers: vec!["F.Cu".to_string(), "F.Paste".to_string()],
        }
    }

    fn footprint(reference: &str, at: Placement, pads: Vec<Pad>) -> Footprint {
        Footprint {
            name: "test".to_string(),
            reference: Some(reference.to_string()),
            at,
            pads,
        }
    }

    fn params(shrink_abs: f64) -> ExtractParameters {
        ExtractParameters {
            shrink_abs,
            ..Default::default()
        }
    }

    #[test]
    fn test_unrotated_pad_outline() {
        let fp = footprint("R1", Placement::new(10.0, 20.0, 0.0), vec![]);
        let stroke = pad_stroke(&fp, &smd(1.0, 0.0, 0.0, 2.0, 1.0), 0.0, 0.0).unwrap();
        let xs: Vec<f64> = stroke.points().iter().map(|p| p.x).collect();
        let ys: Vec<f64> = stroke.points().iter().map(|p| p.y).collect();

        assert_eq!(stroke.len(), 4);
        // pad angle of -180 flips the rectangle onto itself
        assert_relative_eq!(xs.iter().cloned().fold(f64::MAX, f64::min), 10.0, epsilon = 1e-9);
        assert_relative_eq!(xs.iter().cloned().fold(f64::MIN, f64::max), 12.0, epsilon = 1e-9);
        assert_relative_eq!(ys.iter().cloned().fold(f64::MAX, f64::min), 19.5, epsilon = 1e-9);
        assert_relative_eq!(ys.iter().cloned().fold(f64::MIN, f64::max), 20.5, epsilon = 1e-9);
    }

    fn extent(stroke: &Stroke) -> (f64, f64) {
        let xs = stroke.points().iter().map(|p| p.x);
        let ys = stroke.points().iter().map(|p| p.y);
        let (min_x, max_x) = xs.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let (min_y, max_y) = ys.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        (max_x - min_x, max_y - min_y)
    }

    #[test]
    fn test_rotated_footprint_and_pad() {
        // 90 degree footprint, 90 degree pad: net quarter turn of the outline
        let fp = footprint("U1", Placement::new(0.0, 0.0, 90.0), vec![]);
        let stroke = pad_stroke(&fp, &smd(0.0, 0.0, 90.0, 1.0, 3.0), 0.0, 0.0).unwrap();
        let (w, h) = extent(&stroke);
        assert_relative_eq!(w, 3.0, epsilon = 1e-9);
        assert_relative_eq!(h, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pad_follows_footprint_rotation_only_in_angle() {
        // The local pad offset is not rotated with the footprint.
        let fp = footprint("U1", Placement::new(5.0, 5.0, 0.0), vec![]);
        let stroke = pad_stroke(&fp, &smd(2.0, 0.0, 0.0, 1.0, 1.0), 0.0, 0.0).unwrap();
        let cx = stroke.points().iter().map(|p| p.x).sum::<f64>() / 4.0;
        let cy = stroke.points().iter().map(|p| p.y).sum::<f64>() / 4.0;
        assert_relative_eq!(cx, 7.0, epsilon = 1e-9);
        assert_relative_eq!(cy, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_shrink_applies_both_terms() {
        let fp = footprint("R1", Placement::default(), vec![]);
        let stroke = pad_stroke(&fp, &smd(0.0, 0.0, 0.0, 2.0, 1.0), 0.1, 0.1).unwrap();
        let pts = stroke.points();
        assert_relative_eq!(pts[0].distance_to(pts[1]), 2.0 - 0.1 - 0.2, epsilon = 1e-9);
        assert_relative_eq!(pts[1].distance_to(pts[2]), 1.0 - 0.1 - 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_pads_are_dropped() {
        let fp = footprint("R1", Placement::default(), vec![]);
        assert!(pad_stroke(&fp, &smd(0.0, 0.0, 0.0, 0.1, 1.0), 0.1, 0.0).is_none());
        assert!(pad_stroke(&fp, &smd(0.0, 0.0, 0.0, 1.0, 0.05), 0.1, 0.0).is_none());
    }

    #[test]
    fn test_only_smd_pads_on_layer() {
        let mut tht = smd(0.0, 0.0, 0.0, 1.0, 1.0);
        tht.pad_type = PadType::ThruHole;
        let mut back = smd(2.0, 0.0, 0.0, 1.0, 1.0);
        back.layers = vec!["B.Paste".to_string()];
        let board = Board::from_footprints(vec![footprint(
            "J1",
            Placement::default(),
            vec![tht, back, smd(4.0, 0.0, 0.0, 1.0, 1.0)],
        )]);

        let extractor = StrokeExtractor::new(params(0.0)).unwrap();
        assert_eq!(extractor.extract(&board).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_layer() {
        let board = Board {
            layers: vec!["F.Cu".to_string()],
            footprints: Vec::new(),
        };
        let extractor = StrokeExtractor::new(params(0.0)).unwrap();
        assert!(matches!(
            extractor.extract(&board),
            Err(CamToolError::Board(BoardError::UnknownLayer { .. }))
        ));
    }

    #[test]
    fn test_parameter_validation() {
        let bad = ExtractParameters {
            shrink_rel: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            StrokeExtractor::new(bad),
            Err(CamToolError::Parameter(_))
        ));
        let bad = ExtractParameters {
            layer: " ".to_string(),
            ..Default::default()
        };
        assert!(StrokeExtractor::new(bad).is_err());
    }
}
