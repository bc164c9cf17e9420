//! # KiCadCut Core
//!
//! Core types and utilities for KiCadCut.
//! Provides the geometry kernel, shared value types, unit helpers and
//! the error taxonomy used by every other crate.

pub mod error;
pub mod geometry;
pub mod types;
pub mod units;

pub use error::{BoardError, Error, GeometryError, Result, SessionError};

pub use geometry::{rotate, LineSegment, Point, Stroke, Transform};

pub use types::{CutMode, CutPass, Orientation};
