//! KiCadCut Settings Crate
//!
//! Run configuration: defaults, JSON/TOML persistence and validation.

pub mod config;
pub mod error;

pub use config::{default_config_path, PassSettings, PlotterSettings, RunConfig, StencilSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
