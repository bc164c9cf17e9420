//! Stencil job pipeline
//!
//! Glues the stages together for one run: extract pad strokes from the
//! board, normalize and optimize them, then drive a plotter session and/or
//! write an SVG document from the same geometry.

use anyhow::{Context, Result};
use kicadcut_camtools::{
    Board, ExportParameters, ExtractParameters, PathOptimizer, StrokeExtractor, SvgExporter,
};
use kicadcut_communication::{CutPlan, CutProgram, PlotterOption, PlotterSession};
use kicadcut_core::{BoardError, CutMode, LineSegment, Point, Stroke};
use kicadcut_settings::RunConfig;
use std::fmt;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Extra margin between the mat edge and the stencil along x, mm
pub const MAT_MARGIN_X: f64 = 10.0;

/// Read `board_path` and extract the pad strokes on `layer`.
///
/// Fails when the board cannot be read, the layer is unknown, or no pad
/// survives the filter and shrink settings.
pub fn load_strokes(config: &RunConfig, board_path: &Path, layer: &str) -> Result<Vec<Stroke>> {
    let board = Board::load(board_path)
        .with_context(|| format!("Cannot read board {}", board_path.display()))?;

    let extractor = StrokeExtractor::new(ExtractParameters {
        layer: layer.to_string(),
        shrink_abs: config.stencil.shrink_abs,
        shrink_rel: config.stencil.shrink_rel,
        filters: config.stencil.filters.clone(),
    })?;
    let strokes = extractor.extract(&board)?;

    if strokes.is_empty() {
        return Err(BoardError::NoPads {
            layer: layer.to_string(),
        }
        .into());
    }
    Ok(strokes)
}

/// What a run produced, printed on stderr when the job is done
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobSummary {
    pub pads: usize,
    pub segments: usize,
    /// Stencil size including the border, mm
    pub width: f64,
    pub height: f64,
}

impl fmt::Display for JobSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File parsed: {} pads will be cut. Stencil width {:.1}mm, height: {:.1}mm",
            self.pads, self.width, self.height
        )
    }
}

/// Justified strokes and everything derived from them
#[derive(Debug, Clone)]
pub struct StencilJob {
    strokes: Vec<Stroke>,
    lines: Vec<LineSegment>,
    extent: (f64, f64),
    border: Option<Stroke>,
    border_margin: (f64, f64),
}

impl StencilJob {
    /// Rotate, justify and optimize `strokes` according to `config`
    pub fn prepare(config: &RunConfig, strokes: Vec<Stroke>) -> Self {
        let strokes = PathOptimizer::rotate_all(strokes, config.rotation_radians());
        let strokes = PathOptimizer::justify(strokes);
        let extent = PathOptimizer::max_extent(&strokes);
        let border_margin = config.stencil.border;
        let border = config
            .stencil
            .has_border()
            .then(|| PathOptimizer::border_path(extent, border_margin));
        let lines = PathOptimizer::optimize(&strokes, border_margin);

        info!(
            "{} pad strokes reduced to {} cuts, extent {:.2} x {:.2} mm",
            strokes.len(),
            lines.len(),
            extent.0,
            extent.1
        );

        Self {
            strokes,
            lines,
            extent,
            border,
            border_margin,
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Optimized segments, before compensation
    pub fn lines(&self) -> &[LineSegment] {
        &self.lines
    }

    pub fn extent(&self) -> (f64, f64) {
        self.extent
    }

    pub fn border(&self) -> Option<&Stroke> {
        self.border.as_ref()
    }

    /// Where the justified origin lands on the mat, mm
    pub fn origin(&self, config: &RunConfig) -> Point {
        let (ox, oy) = config.plotter.offset;
        let (bx, by) = self.border_margin;
        Point::new(ox + bx + MAT_MARGIN_X, oy + by)
    }

    pub fn summary(&self) -> JobSummary {
        let (bx, by) = self.border_margin;
        JobSummary {
            pads: self.strokes.len(),
            segments: self.lines.len(),
            width: self.extent.0 + 2.0 * bx,
            height: self.extent.1 + 2.0 * by,
        }
    }

    /// Run the complete plotter job on `writer` and hand the writer back
    pub fn cut<W: Write>(&self, config: &RunConfig, writer: W) -> Result<W> {
        let plotter = &config.plotter;
        let (width, height) = plotter.media_size;

        let mut session = PlotterSession::new(writer, plotter.orientation, plotter.compensation)
            .with_scale(plotter.scale)?;
        session.configure_all([
            PlotterOption::MediaSize(width, height),
            PlotterOption::Offset(self.origin(config)),
            PlotterOption::Matrix(plotter.matrix),
        ])?;
        session.begin_job()?;

        let plan = match config.cut_mode {
            CutMode::Precise => CutPlan::Lines(&self.lines),
            CutMode::Fast => CutPlan::Strokes(&self.strokes),
        };
        debug!("Cut mode {}", config.cut_mode);
        CutProgram::from_lists(&config.passes.speed, &config.passes.force).execute(
            &mut session,
            plan,
            self.border(),
        )?;

        session.end_job()?;
        Ok(session.into_inner())
    }

    /// Write the compensated cut as an SVG document
    pub fn export_svg(
        &self,
        config: &RunConfig,
        path: &Path,
        title: &str,
        subject: &str,
    ) -> Result<()> {
        let exporter = SvgExporter::new(ExportParameters {
            media_size: config.plotter.media_size,
            orientation: config.plotter.orientation,
            origin: self.origin(config),
            compensation: config.plotter.compensation,
            title: title.to_string(),
            subject: subject.to_string(),
        })?;
        exporter
            .write_to(path, &self.lines, self.border())
            .with_context(|| format!("Cannot write {}", path.display()))?;
        Ok(())
    }
}
