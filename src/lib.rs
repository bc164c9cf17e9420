//! # KiCadCut
//!
//! Cuts SMD solder-paste stencils from KiCad boards on Graphtec-protocol
//! knife plotters (Silhouette Cameo, Portrait and compatibles).
//!
//! ## Architecture
//!
//! KiCadCut is organized as a workspace with multiple crates:
//!
//! 1. **kicadcut-core** - Geometry kernel, shared value types, errors, units
//! 2. **kicadcut-camtools** - KiCad reader, pad extraction, path optimizer, compensation, SVG export
//! 3. **kicadcut-communication** - Graphtec protocol session, cut programs, output channels
//! 4. **kicadcut-settings** - Run configuration and its JSON/TOML persistence
//! 5. **kicadcut** - Pipeline, command line and the binary that ties them together
//!
//! ## Pipeline
//!
//! board file -> pad strokes -> rotate -> justify -> merge shared edges ->
//! compensated cuts -> plotter byte stream and/or SVG document

pub mod cli;
pub mod pipeline;

pub use kicadcut_camtools as camtools;
pub use kicadcut_communication as communication;
pub use kicadcut_settings as settings;

pub use kicadcut_core::{CutMode, Error, LineSegment, Orientation, Point, Result, Stroke};
pub use pipeline::{load_strokes, JobSummary, StencilJob};

/// Version line printed by `--version`, with the build date
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("KICADCUT_BUILD_DATE"),
    ")"
);

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout stays free for the plotter stream
/// - RUST_LOG environment variable support
/// - `info` by default, `debug` when `verbose` is set
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
