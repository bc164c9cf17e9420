//! Shared value types
//!
//! Small enums and records used by the settings, cutting and plotter crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Media orientation on the cutting mat
///
/// The plotter's native frame is portrait; landscape is produced by
/// exchanging the two emitted coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Native device frame
    #[default]
    Portrait,
    /// Axes exchanged at emission time
    Landscape,
}

impl Orientation {
    /// Numeric code used by the `FN` and `TB50` commands
    pub fn code(self) -> u8 {
        match self {
            Self::Portrait => 0,
            Self::Landscape => 1,
        }
    }

    /// Order a device-space coordinate pair for emission
    pub fn apply_to(self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Self::Portrait => (x, y),
            Self::Landscape => (y, x),
        }
    }
}

impl TryFrom<u8> for Orientation {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Portrait),
            1 => Ok(Self::Landscape),
            other => Err(format!("Unknown orientation code: {}", other)),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Portrait => write!(f, "portrait"),
            Self::Landscape => write!(f, "landscape"),
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "0" | "portrait" => Ok(Self::Portrait),
            "1" | "landscape" => Ok(Self::Landscape),
            _ => Err(format!("Unknown orientation: {}", s)),
        }
    }
}

/// How strokes are turned into blade motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutMode {
    /// Shared edges merged, every segment cut with overcut compensation
    #[default]
    Precise,
    /// Every pad cut as its own closed path
    Fast,
}

impl TryFrom<u8> for CutMode {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Precise),
            1 => Ok(Self::Fast),
            other => Err(format!("Unknown cut mode: {}", other)),
        }
    }
}

impl fmt::Display for CutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precise => write!(f, "precise"),
            Self::Fast => write!(f, "fast"),
        }
    }
}

impl FromStr for CutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "0" | "precise" => Ok(Self::Precise),
            "1" | "fast" => Ok(Self::Fast),
            _ => Err(format!("Unknown cut mode: {}", s)),
        }
    }
}

/// Speed and force for one pass over the whole cut set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutPass {
    /// Blade speed setting (`!` command)
    pub speed: u32,
    /// Blade force setting (`FX` command)
    pub force: u32,
}

impl CutPass {
    /// Create a new pass
    pub const fn new(speed: u32, force: u32) -> Self {
        Self { speed, force }
    }
}
