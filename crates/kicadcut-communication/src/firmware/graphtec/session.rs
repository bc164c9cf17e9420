//! Graphtec plotter session
//!
//! Owns the output writer and the coordinate state (transform, media size,
//! orientation, overcut distance) and turns drawing calls into GP-GL.
//!
//! A session runs through `Idle -> Emitting -> Finished` exactly once.
//! Calls made in the wrong state are rejected before anything is written.

use super::command_creator::{Command, ControlCommand};
use kicadcut_camtools::compensate;
use kicadcut_core::units::{mm_to_device_units, DEFAULT_MEDIA_MM};
use kicadcut_core::{
    GeometryError, LineSegment, Orientation, Point, Result, SessionError, Transform,
};
use std::fmt;
use std::io::Write;
use tracing::{debug, trace};

/// Acceleration used by the initialization sequence
const INIT_ACCELERATION: u32 = 3;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Emitting,
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Emitting => write!(f, "emitting"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// Session settings
///
/// `Speed`, `Force` and `Acceleration` are sent to the device immediately;
/// the rest only change how later coordinates are produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlotterOption {
    Speed(u32),
    Force(u32),
    Acceleration(u32),
    /// Translation in mm, applied before scaling
    Offset(Point),
    /// Row-major linear map `[a, b, c, d]`
    Matrix([f64; 4]),
    /// Media width and height in mm
    MediaSize(f64, f64),
    /// Overcut distance in mm
    Compensation(f64),
}

impl PlotterOption {
    fn is_immediate(&self) -> bool {
        matches!(self, Self::Speed(_) | Self::Force(_) | Self::Acceleration(_))
    }
}

/// A single cutting job on one writer
pub struct PlotterSession<W: Write> {
    writer: W,
    transform: Transform,
    media_size: (f64, f64),
    orientation: Orientation,
    compensation: f64,
    state: SessionState,
}

impl<W: Write> PlotterSession<W> {
    /// Create an idle session with identity transform and 12x12 inch media
    pub fn new(writer: W, orientation: Orientation, compensation: f64) -> Self {
        Self {
            writer,
            transform: Transform::device(),
            media_size: (DEFAULT_MEDIA_MM, DEFAULT_MEDIA_MM),
            orientation,
            compensation,
            state: SessionState::Idle,
        }
    }

    /// Use a different unit scale (device units per mm)
    pub fn with_scale(mut self, scale: f64) -> Result<Self> {
        self.transform = Transform::new(self.transform.matrix(), self.transform.offset(), scale)?;
        Ok(self)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn media_size(&self) -> (f64, f64) {
        self.media_size
    }

    pub fn compensation(&self) -> f64 {
        self.compensation
    }

    /// Recover the writer, e.g. to inspect a buffered job
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn require(&self, expected: SessionState, operation: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation: operation.to_string(),
                state: self.state.to_string(),
            }
            .into())
        }
    }

    fn emit(&mut self, command: Command) -> Result<()> {
        trace!("-> {}", command);
        self.writer.write_all(&command.encode())?;
        Ok(())
    }

    fn emit_all(&mut self, commands: &[Command]) -> Result<()> {
        commands.iter().try_for_each(|command| self.emit(*command))
    }

    /// Apply one option
    pub fn configure(&mut self, option: PlotterOption) -> Result<()> {
        if option.is_immediate() {
            self.require(SessionState::Emitting, "send cut parameters")?;
        } else if self.state == SessionState::Finished {
            return Err(SessionError::InvalidState {
                operation: "configure".to_string(),
                state: self.state.to_string(),
            }
            .into());
        }

        match option {
            PlotterOption::Speed(speed) => self.emit(Command::Speed(speed))?,
            PlotterOption::Force(force) => self.emit(Command::Force(force))?,
            PlotterOption::Acceleration(accel) => self.emit(Command::Acceleration(accel))?,
            PlotterOption::Offset(offset) => {
                self.transform = self.transform.with_offset(offset);
            }
            PlotterOption::Matrix(matrix) => {
                self.transform = self.transform.with_matrix(matrix);
            }
            PlotterOption::MediaSize(width, height) => {
                if width.is_nan() || height.is_nan() || width <= 0.0 || height <= 0.0 {
                    return Err(GeometryError::InvalidMediaSize { width, height }.into());
                }
                self.media_size = (width, height);
            }
            PlotterOption::Compensation(distance) => self.compensation = distance,
        }
        Ok(())
    }

    /// Apply options in order, stopping at the first failure
    pub fn configure_all(&mut self, options: impl IntoIterator<Item = PlotterOption>) -> Result<()> {
        options
            .into_iter()
            .try_for_each(|option| self.configure(option))
    }

    /// Send the initialization handshake and start emitting
    pub fn begin_job(&mut self) -> Result<()> {
        self.require(SessionState::Idle, "begin a job")?;

        let scale = self.transform.scale();
        let (width, height) = self.media_size;
        let orientation = self.orientation;
        debug!(
            "Starting job: media {}x{} mm, {}, scale {}",
            width, height, orientation, scale
        );

        self.emit_all(&[
            Command::Control(ControlCommand::Reset),
            Command::Control(ControlCommand::StatusRequest),
            Command::SelectMat(1),
            Command::Orientation(orientation),
            Command::OrientationCompat(orientation),
            Command::ResetOrigin,
            Command::CuttingArea {
                width: mm_to_device_units(width, scale),
                height: mm_to_device_units(height, scale),
            },
            Command::SelectTool(1),
            Command::Acceleration(INIT_ACCELERATION),
            Command::CutterOffset,
            Command::Acceleration(INIT_ACCELERATION),
            Command::BladeEngage,
        ])?;

        self.state = SessionState::Emitting;
        Ok(())
    }

    /// Park the tool, restore defaults and flush the writer
    pub fn end_job(&mut self) -> Result<()> {
        self.require(SessionState::Emitting, "end a job")?;

        self.emit_all(&[
            Command::LineType(0),
            Command::ResetOrigin,
            Command::ReturnHome,
            Command::SelectTool(0),
            Command::Orientation(Orientation::Portrait),
            Command::OrientationCompat(Orientation::Portrait),
            Command::Control(ControlCommand::StatusRequest),
        ])?;
        self.writer.flush()?;

        self.state = SessionState::Finished;
        debug!("Job finished");
        Ok(())
    }

    fn device_point(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.transform.apply(Point::new(x, y));
        self.orientation.apply_to(p.x, p.y)
    }

    /// Pen-up travel to `(x, y)` mm
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.require(SessionState::Emitting, "move")?;
        let (dx, dy) = self.device_point(x, y);
        self.emit(Command::Move(dx, dy))
    }

    /// Pen-down cut to `(x, y)` mm
    pub fn draw_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.require(SessionState::Emitting, "draw")?;
        let (dx, dy) = self.device_point(x, y);
        self.emit(Command::Draw(dx, dy))
    }

    /// Cut the polygon through `points` and back to its first point.
    ///
    /// Fewer than three points is a no-op.
    pub fn closed_path(&mut self, points: &[Point]) -> Result<()> {
        self.require(SessionState::Emitting, "cut a closed path")?;
        let [first, rest @ ..] = points else {
            return Ok(());
        };
        if points.len() < 3 {
            return Ok(());
        }
        self.move_to(first.x, first.y)?;
        for p in rest {
            self.draw_to(p.x, p.y)?;
        }
        self.draw_to(first.x, first.y)
    }

    /// Cut through `points` without closing
    pub fn open_path(&mut self, points: &[Point]) -> Result<()> {
        self.require(SessionState::Emitting, "cut an open path")?;
        let [first, rest @ ..] = points else {
            return Ok(());
        };
        self.move_to(first.x, first.y)?;
        for p in rest {
            self.draw_to(p.x, p.y)?;
        }
        Ok(())
    }

    /// Cut one segment with overcut applied at both ends
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        self.require(SessionState::Emitting, "cut a line")?;
        let (dx1, dy1, dx2, dy2) = compensate(x1, y1, x2, y2, self.compensation);
        self.move_to(x1 + dx1, y1 + dy1)?;
        self.draw_to(x2 + dx2, y2 + dy2)
    }

    /// [`line`](Self::line) for a segment
    pub fn segment(&mut self, segment: &LineSegment) -> Result<()> {
        let (x1, y1, x2, y2) = segment.coords();
        self.line(x1, y1, x2, y2)
    }
}
