//! Board model and KiCad reader.
//!
//! The extractor only needs footprints and their pads, so that is all this
//! model carries. Both the current `footprint` node and the pre-6.0 `module`
//! node are understood, as are the `fp_text reference` and
//! `property "Reference"` ways of naming a footprint.

use crate::error::CamToolResult;
use crate::sexpr::{self, SExpr};
use kicadcut_core::{BoardError, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Pad kind as written in the board file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadType {
    Smd,
    ThruHole,
    NpThruHole,
    Connect,
    Other(String),
}

impl PadType {
    /// Map the keyword used in the board file; unknown kinds are kept verbatim.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "smd" => Self::Smd,
            "thru_hole" => Self::ThruHole,
            "np_thru_hole" => Self::NpThruHole,
            "connect" => Self::Connect,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smd => write!(f, "smd"),
            Self::ThruHole => write!(f, "thru_hole"),
            Self::NpThruHole => write!(f, "np_thru_hole"),
            Self::Connect => write!(f, "connect"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Position plus rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

impl Placement {
    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self { x, y, rotation }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn from_at(node: &SExpr, owner: &str) -> Result<Self, BoardError> {
        let values = node.numbers();
        if values.len() < 2 {
            return Err(BoardError::Malformed {
                node: owner.to_string(),
                reason: "position needs x and y".to_string(),
            });
        }
        Ok(Self::new(
            values[0],
            values[1],
            values.get(2).copied().unwrap_or(0.0),
        ))
    }
}

/// A copper pad, positioned relative to its footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub number: String,
    pub pad_type: PadType,
    pub shape: String,
    /// Local position; the rotation is the pad's absolute angle as KiCad stores it.
    pub at: Placement,
    pub width: f64,
    pub height: f64,
    pub layers: Vec<String>,
}

impl Pad {
    /// True if any of the pad's layer entries covers `layer`.
    pub fn on_layer(&self, layer: &str) -> bool {
        self.layers.iter().any(|pattern| layer_matches(pattern, layer))
    }

    fn from_sexpr(node: &SExpr) -> Result<Self, BoardError> {
        let malformed = |reason: &str| BoardError::Malformed {
            node: "pad".to_string(),
            reason: reason.to_string(),
        };
        let args = node.args();
        let number = args
            .first()
            .and_then(SExpr::as_text)
            .ok_or_else(|| malformed("missing pad number"))?
            .to_string();
        let pad_type = args
            .get(1)
            .and_then(SExpr::as_text)
            .map(PadType::from_keyword)
            .ok_or_else(|| malformed("missing pad type"))?;
        let shape = args
            .get(2)
            .and_then(SExpr::as_text)
            .unwrap_or_default()
            .to_string();
        let at = node
            .child("at")
            .ok_or_else(|| malformed("missing position"))
            .and_then(|at| Placement::from_at(at, "pad"))?;
        let size = node
            .child("size")
            .map(SExpr::numbers)
            .ok_or_else(|| malformed("missing size"))?;
        let (width, height) = match size.as_slice() {
            [w, h, ..] => (*w, *h),
            [d] => (*d, *d),
            [] => return Err(malformed("empty size")),
        };
        let layers = node
            .child("layers")
            .map(|l| {
                l.args()
                    .iter()
                    .filter_map(SExpr::as_text)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            number,
            pad_type,
            shape,
            at,
            width,
            height,
            layers,
        })
    }
}

/// A placed component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub name: String,
    pub reference: Option<String>,
    pub at: Placement,
    pub pads: Vec<Pad>,
}

impl Footprint {
    fn from_sexpr(node: &SExpr) -> Result<Self, BoardError> {
        let name = node
            .args()
            .first()
            .and_then(SExpr::as_text)
            .unwrap_or_default()
            .to_string();
        let at = node
            .child("at")
            .ok_or_else(|| BoardError::Malformed {
                node: "footprint".to_string(),
                reason: format!("{} has no position", name),
            })
            .and_then(|at| Placement::from_at(at, "footprint"))?;
        let pads = node
            .children("pad")
            .map(Pad::from_sexpr)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            reference: reference_of(node),
            name,
            at,
            pads,
        })
    }
}

fn reference_of(node: &SExpr) -> Option<String> {
    let text_ref = node.children("fp_text").find_map(|t| match t.args() {
        [kind, value, ..] if kind.as_text() == Some("reference") => value.as_text(),
        _ => None,
    });
    let property_ref = || {
        node.children("property").find_map(|p| match p.args() {
            [key, value, ..] if key.as_text() == Some("Reference") => value.as_text(),
            _ => None,
        })
    };
    text_ref.or_else(property_ref).map(str::to_string)
}

/// Match a pad layer entry against a concrete layer name.
///
/// Supports the wildcard forms KiCad writes: `*.Cu` and `F&B.Cu`.
pub fn layer_matches(pattern: &str, layer: &str) -> bool {
    if pattern == layer {
        return true;
    }
    let (Some((side, kind)), Some((layer_side, layer_kind))) =
        (pattern.split_once('.'), layer.split_once('.'))
    else {
        return false;
    };
    if kind != layer_kind {
        return false;
    }
    match side {
        "*" => true,
        "F&B" => layer_side == "F" || layer_side == "B",
        _ => false,
    }
}

/// Footprints of one board plus its declared layer names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    pub layers: Vec<String>,
    pub footprints: Vec<Footprint>,
}

impl Board {
    /// Build a board directly from footprints (no layer table).
    pub fn from_footprints(footprints: Vec<Footprint>) -> Self {
        Self {
            layers: Vec::new(),
            footprints,
        }
    }

    /// Parse the contents of a `.kicad_pcb` file.
    pub fn from_kicad_str(content: &str) -> Result<Self, BoardError> {
        let root = sexpr::parse(content)?;
        if root.head() != Some("kicad_pcb") {
            return Err(BoardError::NotABoard {
                reason: format!(
                    "top-level node is '{}'",
                    root.head().unwrap_or("<none>")
                ),
            });
        }

        let layers = root
            .child("layers")
            .map(|table| {
                table
                    .args()
                    .iter()
                    .filter_map(|entry| entry.as_list()?.get(1)?.as_text())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let footprints = root
            .args()
            .iter()
            .filter(|node| matches!(node.head(), Some("footprint") | Some("module")))
            .map(Footprint::from_sexpr)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            layers = ?layers,
            footprints = footprints.len(),
            "Parsed KiCad board"
        );
        Ok(Self { layers, footprints })
    }

    /// Read and parse a `.kicad_pcb` file.
    pub fn load(path: &Path) -> CamToolResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let board = Self::from_kicad_str(&content)?;
        info!(
            "Loaded {} with {} footprints",
            path.display(),
            board.footprints.len()
        );
        Ok(board)
    }

    /// True if the board declares `layer`, or declares no layer table at all.
    pub fn has_layer(&self, layer: &str) -> bool {
        self.layers.is_empty() || self.layers.iter().any(|l| l == layer)
    }

    /// Total number of pads on the board.
    pub fn pad_count(&self) -> usize {
        self.footprints.iter().map(|f| f.pads.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = r#"(kicad_pcb (version 20221018) (generator pcbnew)
  (layers
    (0 "F.Cu" signal)
    (31 "B.Cu" signal)
    (35 "F.Paste" user)
  )
  (footprint "Resistor_SMD:R_0603" (layer "F.Cu")
    (at 100 50 90)
    (property "Reference" "R1" (at 0 -1.4 90))
    (pad "1" smd roundrect (at -0.825 0 90) (size 0.8 0.95) (layers "F.Cu" "F.Paste" "F.Mask"))
    (pad "2" smd roundrect (at 0.825 0 90) (size 0.8 0.95) (layers "F.Cu" "F.Paste" "F.Mask"))
  )
  (module Connector:Pin (layer F.Cu) (at 10 20)
    (fp_text reference J1 (at 0 0))
    (pad 1 thru_hole circle (at 0 0) (size 1.7 1.7) (drill 1) (layers *.Cu *.Mask))
  )
)"#;

    #[test]
    fn test_parse_board() {
        let board = Board::from_kicad_str(BOARD).unwrap();
        assert_eq!(board.layers, vec!["F.Cu", "B.Cu", "F.Paste"]);
        assert_eq!(board.footprints.len(), 2);
        assert_eq!(board.pad_count(), 3);

        let r1 = &board.footprints[0];
        assert_eq!(r1.reference.as_deref(), Some("R1"));
        assert_eq!(r1.at, Placement::new(100.0, 50.0, 90.0));
        assert_eq!(r1.pads[1].pad_type, PadType::Smd);
        assert_eq!(r1.pads[1].width, 0.8);
        assert!(r1.pads[1].on_layer("F.Paste"));
        assert!(!r1.pads[1].on_layer("B.Paste"));

        let j1 = &board.footprints[1];
        assert_eq!(j1.reference.as_deref(), Some("J1"));
        assert_eq!(j1.at.rotation, 0.0);
        assert_eq!(j1.pads[0].pad_type, PadType::ThruHole);
        assert!(j1.pads[0].on_layer("B.Cu"));
    }

    #[test]
    fn test_has_layer() {
        let board = Board::from_kicad_str(BOARD).unwrap();
        assert!(board.has_layer("F.Paste"));
        assert!(!board.has_layer("B.Paste"));
        assert!(Board::default().has_layer("anything"));
    }

    #[test]
    fn test_layer_wildcards() {
        assert!(layer_matches("*.Cu", "F.Cu"));
        assert!(layer_matches("F&B.Cu", "B.Cu"));
        assert!(!layer_matches("*.Cu", "F.Paste"));
        assert!(!layer_matches("F.Cu", "B.Cu"));
    }

    #[test]
    fn test_rejects_other_documents() {
        assert!(matches!(
            Board::from_kicad_str("(kicad_sch (version 1))"),
            Err(BoardError::NotABoard { .. })
        ));
        assert!(matches!(
            Board::from_kicad_str("(kicad_pcb (footprint x (pad 1 smd rect (size 1 1))))"),
            Err(BoardError::Malformed { .. })
        ));
    }
}
