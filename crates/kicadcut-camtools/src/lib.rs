//! # KiCadCut stencil tools
//!
//! Geometry stages between a KiCad board file and the plotter:
//!
//! - **Board reader**: s-expression parser and footprint/pad model
//! - **Extractor**: SMD pad outlines on one layer, with shrink and reference filter
//! - **Optimizer**: rotation, justification and shared-edge merging
//! - **Compensation**: per-segment overcut for drag knives
//! - **Export**: SVG rendering of the final cut

pub mod board;
pub mod compensation;
pub mod error;
pub mod export;
pub mod extract;
pub mod filter;
pub mod optimizer;
pub mod sexpr;

pub use board::{Board, Footprint, Pad, PadType, Placement};
pub use compensation::{compensate, compensate_segment};
pub use error::{CamToolError, CamToolResult, ParameterError};
pub use export::{ExportParameters, SvgExporter};
pub use extract::{pad_stroke, ExtractParameters, StrokeExtractor};
pub use filter::ReferenceFilter;
pub use optimizer::{EdgeKey, PathOptimizer};
