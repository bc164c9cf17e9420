//! Graphtec (GP-GL) command creator
//!
//! Typed constructors for the small subset of GP-GL used to cut stencils.
//! Every textual command is terminated by ETX (0x03); the two escape
//! sequences for reset and status are sent bare.

use kicadcut_core::Orientation;
use std::fmt;

/// Command terminator
pub const ETX: u8 = 0x03;

/// Escape-prefixed control sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Initialize the device
    Reset,
    /// Ask the device for its status
    StatusRequest,
}

impl ControlCommand {
    /// Raw bytes, sent without terminator
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Reset => b"\x1b\x04",
            Self::StatusRequest => b"\x1b\x05",
        }
    }
}

/// A single GP-GL command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Control(ControlCommand),
    /// `TG<n>`: cutting mat selection
    SelectMat(u8),
    /// `FN<o>`: page orientation
    Orientation(Orientation),
    /// `TB50,<o>`: orientation, alternate code kept for older firmware
    OrientationCompat(Orientation),
    /// `\0,0`: reset the origin
    ResetOrigin,
    /// `Z<w>,<h>`: upper right corner of the cutting area in device units
    CuttingArea { width: i64, height: i64 },
    /// `J<n>`: tool holder selection, 0 lifts the tool
    SelectTool(u8),
    /// `TJ<n>`: acceleration
    Acceleration(u32),
    /// `FC18,1,1`: cutter offset calibration
    CutterOffset,
    /// `FE0,1`: blade engage mode
    BladeEngage,
    /// `!<s>,1`: speed
    Speed(u32),
    /// `FX<f>,1`: force
    Force(u32),
    /// `L<n>`: line type
    LineType(u8),
    /// `M0,0`: travel back to the device origin
    ReturnHome,
    /// `M<x>,<y>`: pen-up travel, device units
    Move(f64, f64),
    /// `D<x>,<y>`: pen-down cut, device units
    Draw(f64, f64),
}

impl Command {
    /// Bytes as sent to the device, terminator included
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Control(control) => control.as_bytes().to_vec(),
            text => {
                let mut bytes = text.to_string().into_bytes();
                bytes.push(ETX);
                bytes
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Control(ControlCommand::Reset) => write!(f, "<ESC><EOT>"),
            Self::Control(ControlCommand::StatusRequest) => write!(f, "<ESC><ENQ>"),
            Self::SelectMat(mat) => write!(f, "TG{}", mat),
            Self::Orientation(o) => write!(f, "FN{}", o.code()),
            Self::OrientationCompat(o) => write!(f, "TB50,{}", o.code()),
            Self::ResetOrigin => write!(f, "\\0,0"),
            Self::CuttingArea { width, height } => write!(f, "Z{},{}", width, height),
            Self::SelectTool(tool) => write!(f, "J{}", tool),
            Self::Acceleration(accel) => write!(f, "TJ{}", accel),
            Self::CutterOffset => write!(f, "FC18,1,1"),
            Self::BladeEngage => write!(f, "FE0,1"),
            Self::Speed(speed) => write!(f, "!{},1", speed),
            Self::Force(force) => write!(f, "FX{},1", force),
            Self::LineType(kind) => write!(f, "L{}", kind),
            Self::ReturnHome => write!(f, "M0,0"),
            Self::Move(x, y) => write!(f, "M{:.3},{:.3}", x, y),
            Self::Draw(x, y) => write!(f, "D{:.3},{:.3}", x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_commands_have_no_terminator() {
        assert_eq!(Command::Control(ControlCommand::Reset).encode(), b"\x1b\x04");
        assert_eq!(
            Command::Control(ControlCommand::StatusRequest).encode(),
            b"\x1b\x05"
        );
    }

    #[test]
    fn test_text_commands() {
        assert_eq!(Command::Speed(2).encode(), b"!2,1\x03");
        assert_eq!(Command::Force(30).encode(), b"FX30,1\x03");
        assert_eq!(Command::ResetOrigin.encode(), b"\\0,0\x03");
        assert_eq!(
            Command::CuttingArea { width: 6096, height: 6096 }.encode(),
            b"Z6096,6096\x03"
        );
        assert_eq!(
            Command::OrientationCompat(Orientation::Landscape).encode(),
            b"TB50,1\x03"
        );
    }

    #[test]
    fn test_coordinates_use_three_decimals() {
        assert_eq!(Command::Move(200.0, 10.5).encode(), b"M200.000,10.500\x03");
        assert_eq!(Command::Draw(-1.25, 1.0 / 3.0).to_string(), "D-1.250,0.333");
    }
}
