//! SVG export of the stencil cut.
//!
//! Produces a one-page document sized to the media, with the compensated cut
//! lines and the border rectangle drawn as hairlines in millimetre units.

use crate::compensation::compensate_segment;
use crate::error::{CamToolError, CamToolResult};
use kicadcut_core::{LineSegment, Orientation, Point, Stroke};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;
use tracing::info;

/// Parameters for document export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportParameters {
    /// Media width and height (mm)
    pub media_size: (f64, f64),
    pub orientation: Orientation,
    /// Translation applied to every line before drawing (mm)
    pub origin: Point,
    /// Overcut distance, identical to the plotter's (mm)
    pub compensation: f64,
    /// Document title, usually the board file name
    pub title: String,
    /// Document subject, usually the layer name
    pub subject: String,
}

impl Default for ExportParameters {
    fn default() -> Self {
        Self {
            media_size: (304.8, 304.8),
            orientation: Orientation::Portrait,
            origin: Point::origin(),
            compensation: 0.0,
            title: String::new(),
            subject: String::new(),
        }
    }
}

/// Renders cut lines into an SVG document
pub struct SvgExporter {
    params: ExportParameters,
}

impl SvgExporter {
    pub fn new(params: ExportParameters) -> CamToolResult<Self> {
        let (w, h) = params.media_size;
        if w <= 0.0 || h <= 0.0 {
            return Err(CamToolError::InvalidParameters(format!(
                "media size must be positive, got {}x{}",
                w, h
            )));
        }
        Ok(Self { params })
    }

    fn page_size(&self) -> (f64, f64) {
        let (w, h) = self.params.media_size;
        match self.params.orientation {
            Orientation::Portrait => (w.min(h), w.max(h)),
            Orientation::Landscape => (w.max(h), w.min(h)),
        }
    }

    /// Render `lines` (compensated here) and the optional uncompensated border.
    pub fn render(&self, lines: &[LineSegment], border: Option<&Stroke>) -> CamToolResult<String> {
        let p = &self.params;
        let (width, height) = self.page_size();
        let origin = p.origin;
        let mut svg = String::new();

        writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#)?;
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w:.3}mm" height="{h:.3}mm" viewBox="0 0 {w:.3} {h:.3}">"#,
            w = width,
            h = height
        )?;
        writeln!(svg, "  <title>{}</title>", escape(&p.title))?;
        writeln!(svg, "  <desc>KiCadCut stencil: {}</desc>", escape(&p.subject))?;
        writeln!(
            svg,
            r#"  <g fill="none" stroke="black" stroke-width="0" vector-effect="non-scaling-stroke">"#
        )?;

        for line in lines {
            let shifted = LineSegment::new(
                line.start.offset(origin.x, origin.y),
                line.end.offset(origin.x, origin.y),
            );
            let (x1, y1, x2, y2) = compensate_segment(&shifted, p.compensation).coords();
            writeln!(
                svg,
                r#"    <line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}"/>"#,
                x1, y1, x2, y2
            )?;
        }

        if let Some(border) = border {
            for edge in border.edges() {
                let (x1, y1, x2, y2) = edge.coords();
                writeln!(
                    svg,
                    r#"    <line class="border" x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}"/>"#,
                    x1 + origin.x,
                    y1 + origin.y,
                    x2 + origin.x,
                    y2 + origin.y
                )?;
            }
        }

        writeln!(svg, "  </g>")?;
        writeln!(svg, "</svg>")?;
        Ok(svg)
    }

    /// Render and write the document to `path`
    pub fn write_to(
        &self,
        path: &Path,
        lines: &[LineSegment],
        border: Option<&Stroke>,
    ) -> CamToolResult<()> {
        let svg = self.render(lines, border)?;
        std::fs::write(path, svg)?;
        info!("Wrote stencil document to {}", path.display());
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
