//! Error types for the stencil tools crate.
//!
//! This module provides structured error types for pad extraction,
//! parameter validation and document export.

use kicadcut_core::BoardError;
use std::io;
use thiserror::Error;

/// Errors that can occur during stencil tool operations.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// Invalid parameters were provided to a tool.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The board could not be read or interpreted.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// A reference filter pattern could not be compiled.
    #[error("Invalid filter pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Document export failed.
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Errors related to parameter validation.
#[derive(Error, Debug)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl From<std::fmt::Error> for CamToolError {
    fn from(err: std::fmt::Error) -> Self {
        CamToolError::ExportFailed(err.to_string())
    }
}

/// Result type alias for stencil tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cam_tool_error_display() {
        let err = CamToolError::InvalidParameters("layer must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid parameters: layer must not be empty");

        let err = CamToolError::InvalidPattern {
            pattern: "U[1".to_string(),
            reason: "unclosed class".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid filter pattern 'U[1': unclosed class"
        );
    }

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::OutOfRange {
            name: "shrink_rel".to_string(),
            value: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'shrink_rel' out of range: 1.5 (valid: 0..1)"
        );
    }

    #[test]
    fn test_error_conversion() {
        let board_err = BoardError::UnknownLayer {
            layer: "X.Cu".to_string(),
        };
        let err: CamToolError = board_err.into();
        assert!(matches!(err, CamToolError::Board(_)));
        assert_eq!(err.to_string(), "Unknown layer: X.Cu");

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: CamToolError = io_err.into();
        assert!(matches!(err, CamToolError::IoError(_)));
    }
}
