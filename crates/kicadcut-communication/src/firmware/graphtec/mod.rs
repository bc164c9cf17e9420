//! Graphtec GP-GL support (Silhouette Cameo, Portrait and compatible cutters)

pub mod command_creator;
pub mod program;
pub mod session;

pub use command_creator::{Command, ControlCommand, ETX};
pub use program::{CutPlan, CutProgram, PASS_ACCELERATION};
pub use session::{PlotterOption, PlotterSession, SessionState};
