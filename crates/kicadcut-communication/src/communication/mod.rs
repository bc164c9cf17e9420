//! Output channels
//!
//! The command stream goes to exactly one sink per run: standard output, a
//! file (which may be a device node such as `/dev/usb/lp0`), or a serial port.

pub mod serial;

use kicadcut_core::Result;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

/// Where the plotter command stream is written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// Process standard output
    #[default]
    Stdout,
    /// File or device node, truncated on open
    File(PathBuf),
    /// Serial port at the given baud rate
    Serial { port: String, baud: u32 },
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Serial { port, baud } => write!(f, "{} @ {} baud", port, baud),
        }
    }
}

/// Open the sink for writing
pub fn open_output(target: &OutputTarget) -> Result<Box<dyn Write + Send>> {
    let writer: Box<dyn Write + Send> = match target {
        OutputTarget::Stdout => Box::new(io::stdout()),
        OutputTarget::File(path) => Box::new(
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?,
        ),
        OutputTarget::Serial { port, baud } => serial::open_serial(port, *baud)?,
    };
    tracing::debug!("Output channel opened: {}", target);
    Ok(writer)
}
