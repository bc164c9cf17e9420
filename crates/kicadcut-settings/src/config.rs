//! Run configuration for KiCadCut
//!
//! One immutable [`RunConfig`] describes a cutting run. It starts from the
//! built-in defaults, is optionally read from a JSON or TOML file and is
//! finally overridden by command line flags.
//!
//! Configuration is organized into sections:
//! - Plotter (offset, calibration matrix, media, orientation, overcut)
//! - Stencil (border, rotation, pad shrink, reference filters)
//! - Passes (speed and force per pass)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use kicadcut_core::units::{normalize_media, DEFAULT_MEDIA_MM, DEVICE_UNITS_PER_MM};
use kicadcut_core::{CutMode, Orientation};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Plotter placement and calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterSettings {
    /// Stencil offset on the mat in mm
    pub offset: (f64, f64),
    /// Linear calibration map `[a, b, c, d]`
    pub matrix: [f64; 4],
    /// Media width and height in mm, short edge first
    pub media_size: (f64, f64),
    pub orientation: Orientation,
    /// Overcut at both ends of every optimized segment, mm
    pub compensation: f64,
    /// Device units per mm
    pub scale: f64,
}

impl Default for PlotterSettings {
    fn default() -> Self {
        Self {
            offset: (10.0, 10.0),
            matrix: [1.0, 0.0, 0.0, 1.0],
            media_size: (DEFAULT_MEDIA_MM, DEFAULT_MEDIA_MM),
            orientation: Orientation::Portrait,
            compensation: 0.02,
            scale: DEVICE_UNITS_PER_MM,
        }
    }
}

/// Stencil geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StencilSettings {
    /// Horizontal and vertical margin of the border cut, mm; `(0, 0)` disables it
    pub border: (f64, f64),
    /// Rotation of the whole design in degrees
    pub rotation: f64,
    /// Absolute pad shrink, mm
    pub shrink_abs: f64,
    /// Relative pad shrink as a fraction (0.1 = 10 %)
    pub shrink_rel: f64,
    /// Reference designator globs
    pub filters: Vec<String>,
}

impl Default for StencilSettings {
    fn default() -> Self {
        Self {
            border: (10.0, 10.0),
            rotation: 0.0,
            shrink_abs: 0.05,
            shrink_rel: 0.0,
            filters: Vec::new(),
        }
    }
}

impl StencilSettings {
    pub fn has_border(&self) -> bool {
        self.border.0 != 0.0 || self.border.1 != 0.0
    }
}

/// Speed and force per pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassSettings {
    pub speed: Vec<u32>,
    pub force: Vec<u32>,
}

impl Default for PassSettings {
    fn default() -> Self {
        Self {
            speed: vec![2, 2],
            force: vec![8, 30],
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunConfig {
    pub cut_mode: CutMode,
    pub plotter: PlotterSettings,
    pub stencil: StencilSettings,
    pub passes: PassSettings,
}

fn positive(value: f64) -> bool {
    value > 0.0
}

fn non_negative(value: f64) -> bool {
    value >= 0.0
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("<none>").to_string()).into()),
    }
}

impl RunConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        let config = config.normalized();
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Put the short media edge first
    pub fn normalized(mut self) -> Self {
        let (w, h) = self.plotter.media_size;
        self.plotter.media_size = normalize_media(w, h);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let plotter = &self.plotter;
        if !positive(plotter.scale) {
            return Err(SettingsError::invalid("plotter.scale", "must be > 0"));
        }

        let (w, h) = plotter.media_size;
        if !(positive(w) && positive(h)) {
            return Err(SettingsError::invalid(
                "plotter.media_size",
                format!("{}x{} must be positive", w, h),
            ));
        }

        if !non_negative(plotter.compensation) {
            return Err(SettingsError::invalid("plotter.compensation", "must be >= 0"));
        }

        if plotter.matrix.iter().any(|v| !v.is_finite()) {
            return Err(SettingsError::invalid("plotter.matrix", "must be finite"));
        }

        let stencil = &self.stencil;
        if !(non_negative(stencil.border.0) && non_negative(stencil.border.1)) {
            return Err(SettingsError::invalid("stencil.border", "must be >= 0"));
        }

        if !non_negative(stencil.shrink_abs) {
            return Err(SettingsError::invalid("stencil.shrink_abs", "must be >= 0"));
        }

        if !(0.0..1.0).contains(&stencil.shrink_rel) {
            return Err(ConfigError::ValueOutOfRange {
                key: "stencil.shrink_rel".to_string(),
                value: stencil.shrink_rel.to_string(),
            }
            .into());
        }

        if self.passes.speed.is_empty() || self.passes.force.is_empty() {
            return Err(SettingsError::invalid(
                "passes",
                "at least one speed and one force are required",
            ));
        }

        Ok(())
    }

    /// Design rotation in radians
    pub fn rotation_radians(&self) -> f64 {
        self.stencil.rotation.to_radians()
    }
}

/// Per-user configuration file, e.g. `~/.config/kicadcut/config.toml`
pub fn default_config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("kicadcut").join("config.toml"))
        .ok_or_else(|| SettingsError::ConfigDirectory("no configuration directory".to_string()))
}
