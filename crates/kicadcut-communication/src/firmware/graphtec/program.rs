//! Multi-pass cut programs
//!
//! Each pass sets its own speed and force and then repeats the full cut,
//! followed by the border rectangle when there is one.

use super::session::{PlotterOption, PlotterSession};
use kicadcut_core::{CutPass, LineSegment, Result, Stroke};
use std::io::Write;
use tracing::{info, warn};

/// Acceleration sent at the start of every pass
pub const PASS_ACCELERATION: u32 = 3;

/// What each pass cuts
#[derive(Debug, Clone, Copy)]
pub enum CutPlan<'a> {
    /// Optimized segments, each cut with overcut compensation
    Lines(&'a [LineSegment]),
    /// Raw pad outlines, each cut as a closed path
    Strokes(&'a [Stroke]),
}

impl CutPlan<'_> {
    fn len(&self) -> usize {
        match self {
            Self::Lines(lines) => lines.len(),
            Self::Strokes(strokes) => strokes.len(),
        }
    }
}

/// Ordered list of passes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CutProgram {
    passes: Vec<CutPass>,
}

impl CutProgram {
    pub fn new(passes: Vec<CutPass>) -> Self {
        Self { passes }
    }

    /// Pair speeds with forces; extra entries in the longer list are ignored
    pub fn from_lists(speeds: &[u32], forces: &[u32]) -> Self {
        if speeds.len() != forces.len() {
            warn!(
                "{} speeds but {} forces given, cutting {} passes",
                speeds.len(),
                forces.len(),
                speeds.len().min(forces.len())
            );
        }
        Self::new(
            speeds
                .iter()
                .zip(forces)
                .map(|(&speed, &force)| CutPass::new(speed, force))
                .collect(),
        )
    }

    pub fn passes(&self) -> &[CutPass] {
        &self.passes
    }

    /// Run every pass on an emitting session
    pub fn execute<W: Write>(
        &self,
        session: &mut PlotterSession<W>,
        plan: CutPlan<'_>,
        border: Option<&Stroke>,
    ) -> Result<()> {
        for (index, pass) in self.passes.iter().enumerate() {
            info!(
                "Pass {}/{}: speed {}, force {}, {} cuts",
                index + 1,
                self.passes.len(),
                pass.speed,
                pass.force,
                plan.len()
            );
            session.configure_all([
                PlotterOption::Speed(pass.speed),
                PlotterOption::Force(pass.force),
                PlotterOption::Acceleration(PASS_ACCELERATION),
            ])?;

            match plan {
                CutPlan::Lines(lines) => {
                    for segment in lines {
                        session.segment(segment)?;
                    }
                }
                CutPlan::Strokes(strokes) => {
                    for stroke in strokes {
                        session.closed_path(stroke.points())?;
                    }
                }
            }

            if let Some(border) = border {
                session.closed_path(border.points())?;
            }
        }
        Ok(())
    }
}
