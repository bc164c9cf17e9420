//! # KiCadCut Communication
//!
//! Plotter protocol encoding and output channels for KiCadCut.
//! The Graphtec session turns millimetre geometry into a GP-GL byte stream
//! written to stdout, a file or device node, or a serial port.

pub mod communication;
pub mod firmware;

pub use communication::{
    open_output,
    serial::{list_ports, open_serial, SerialPortInfo},
    OutputTarget,
};
pub use firmware::graphtec::{
    Command, ControlCommand, CutPlan, CutProgram, PlotterOption, PlotterSession, SessionState,
};
