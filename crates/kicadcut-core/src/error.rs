//! Error handling for KiCadCut
//!
//! Provides error types for all layers of the stencil pipeline:
//! - Board errors (reading and interpreting the design file)
//! - Session errors (plotter protocol misuse)
//! - Geometry errors (invalid transforms)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Board error type
///
/// Represents input problems: the board file cannot be read, parsed or does
/// not contain what the run asked for.
#[derive(Error, Debug, Clone)]
pub enum BoardError {
    /// Board file could not be parsed
    #[error("Parse error at line {line}: {reason}")]
    Parse {
        /// The line number where parsing failed (1-indexed).
        line: usize,
        /// The reason parsing failed.
        reason: String,
    },

    /// The file does not look like a KiCad board
    #[error("Not a KiCad board: {reason}")]
    NotABoard {
        /// Why the file was rejected.
        reason: String,
    },

    /// Requested layer is not declared by the board
    #[error("Unknown layer: {layer}")]
    UnknownLayer {
        /// The requested layer name.
        layer: String,
    },

    /// Malformed footprint or pad record
    #[error("Malformed {node}: {reason}")]
    Malformed {
        /// The s-expression node name (e.g. `pad`).
        node: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Extraction produced nothing to cut
    #[error("No pads found on layer {layer}")]
    NoPads {
        /// The requested layer name.
        layer: String,
    },
}

/// Session error type
///
/// Raised when plotter session operations are called outside the
/// `Idle → Emitting → Finished` window they belong to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Operation is not valid in the current session state
    #[error("Cannot {operation} while session is {state}")]
    InvalidState {
        /// The operation that was attempted.
        operation: String,
        /// The state the session was in.
        state: String,
    },
}

/// Geometry error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Unit scale must be strictly positive
    #[error("Invalid scale {scale}: must be > 0")]
    InvalidScale {
        /// The rejected scale factor.
        scale: f64,
    },

    /// Media dimensions must be strictly positive
    #[error("Invalid media size {width}x{height}")]
    InvalidMediaSize {
        /// Media width in mm.
        width: f64,
        /// Media height in mm.
        height: f64,
    },
}

/// Main error type for KiCadCut
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Board error
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an input (board) error
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Board(_))
    }

    /// Check if this is a session misuse error
    pub fn is_session_error(&self) -> bool {
        matches!(self, Error::Session(_))
    }

    /// Check if this is an output channel failure
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::UnknownLayer {
            layer: "F.Pste".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown layer: F.Pste");

        let err = BoardError::Parse {
            line: 12,
            reason: "unterminated string".to_string(),
        };
        assert_eq!(err.to_string(), "Parse error at line 12: unterminated string");
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::InvalidState {
            operation: "draw".to_string(),
            state: "idle".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot draw while session is idle");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = BoardError::NoPads {
            layer: "F.Paste".to_string(),
        }
        .into();
        assert!(err.is_input_error());
        assert_eq!(err.to_string(), "No pads found on layer F.Paste");

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "device gone");
        let err: Error = io_err.into();
        assert!(err.is_io_error());
        assert!(!err.is_session_error());
    }
}
