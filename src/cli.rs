//! Command line interface
//!
//! Every tuning flag is optional and, when given, overrides the value coming
//! from the defaults or from `--config`.

use clap::Parser;
use kicadcut_communication::OutputTarget;
use kicadcut_core::{CutMode, Orientation};
use kicadcut_settings::RunConfig;
use std::path::PathBuf;

/// Default serial baud rate for `--port`
pub const DEFAULT_BAUD: u32 = 9600;

#[derive(Parser, Debug, Clone)]
#[command(name = "kicadcut", version, long_version = crate::LONG_VERSION)]
#[command(
    about = "Cut SMD solder-paste stencils from KiCad boards on Graphtec/Silhouette plotters",
    long_about = None
)]
pub struct Cli {
    /// KiCad board file (.kicad_pcb)
    pub board: Option<PathBuf>,

    /// Layer to cut, e.g. F.Paste or B.Paste
    pub layer: Option<String>,

    /// Write the plotter stream to a file or device node instead of stdout
    #[arg(long, value_name = "PATH", conflicts_with = "port")]
    pub file: Option<PathBuf>,

    /// Write the plotter stream to a serial port
    #[arg(long, value_name = "DEV")]
    pub port: Option<String>,

    /// Serial baud rate
    #[arg(long, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    /// List serial ports that look like plotters and exit
    #[arg(long)]
    pub list_ports: bool,

    /// Stencil offset on the mat, mm
    #[arg(long, value_name = "X,Y", value_parser = parse_pair, allow_hyphen_values = true)]
    pub offset: Option<(f64, f64)>,

    /// Horizontal and vertical border margin, mm (0,0 disables the border)
    #[arg(long, value_name = "H,V", value_parser = parse_pair, allow_hyphen_values = true)]
    pub border: Option<(f64, f64)>,

    /// Calibration matrix
    #[arg(long, value_name = "A,B,C,D", value_parser = parse_matrix, allow_hyphen_values = true)]
    pub matrix: Option<[f64; 4]>,

    /// Speed for each pass
    #[arg(long, value_name = "S[,S]", value_delimiter = ',')]
    pub speed: Option<Vec<u32>>,

    /// Force for each pass
    #[arg(long, value_name = "F[,F]", value_delimiter = ',')]
    pub force: Option<Vec<u32>>,

    /// 0 = precise (merged edges with overcut), 1 = fast (closed pad outlines)
    #[arg(long, alias = "cut_mode", value_name = "MODE")]
    pub cut_mode: Option<CutMode>,

    /// Media size, mm
    #[arg(long, value_name = "W,H", value_parser = parse_pair)]
    pub media: Option<(f64, f64)>,

    /// Rotate the design, degrees
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub rotate: Option<f64>,

    /// Shrink every pad edge by this much, mm
    #[arg(long, alias = "shrink_abs", value_name = "MM")]
    pub shrink_abs: Option<f64>,

    /// Shrink every pad by this percentage of its size
    #[arg(long, alias = "shrink_rel", value_name = "PERCENT")]
    pub shrink_rel: Option<f64>,

    /// Only cut pads whose reference matches one of these globs
    #[arg(long, value_name = "P[,P]", value_delimiter = ',')]
    pub filter: Option<Vec<String>>,

    /// Overcut at both ends of every segment, mm
    #[arg(long, value_name = "MM")]
    pub comp: Option<f64>,

    /// 0 = portrait, 1 = landscape
    #[arg(long, value_name = "0|1")]
    pub orientation: Option<Orientation>,

    /// Also write <board-stem>.svg into the working directory
    #[arg(long)]
    pub svg: bool,

    /// Read settings from a .toml or .json file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Save the effective settings to a .toml or .json file
    #[arg(long, value_name = "PATH")]
    pub save_config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse `x,y`
pub fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    match parse_floats(s)?.as_slice() {
        &[x, y] => Ok((x, y)),
        other => Err(format!("expected 2 comma separated numbers, got {}", other.len())),
    }
}

/// Parse `a,b,c,d`
pub fn parse_matrix(s: &str) -> Result<[f64; 4], String> {
    match parse_floats(s)?.as_slice() {
        &[a, b, c, d] => Ok([a, b, c, d]),
        other => Err(format!("expected 4 comma separated numbers, got {}", other.len())),
    }
}

fn parse_floats(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {}", part.trim(), e))
        })
        .collect()
}

impl Cli {
    /// Overlay the flags that were given on top of `config`
    pub fn apply_to(&self, config: &mut RunConfig) {
        if let Some(offset) = self.offset {
            config.plotter.offset = offset;
        }
        if let Some(matrix) = self.matrix {
            config.plotter.matrix = matrix;
        }
        if let Some(media) = self.media {
            config.plotter.media_size = media;
        }
        if let Some(orientation) = self.orientation {
            config.plotter.orientation = orientation;
        }
        if let Some(comp) = self.comp {
            config.plotter.compensation = comp;
        }

        if let Some(border) = self.border {
            config.stencil.border = border;
        }
        if let Some(rotate) = self.rotate {
            config.stencil.rotation = rotate;
        }
        if let Some(shrink_abs) = self.shrink_abs {
            config.stencil.shrink_abs = shrink_abs;
        }
        if let Some(percent) = self.shrink_rel {
            config.stencil.shrink_rel = percent / 100.0;
        }
        if let Some(filter) = &self.filter {
            config.stencil.filters = filter.clone();
        }

        if let Some(speed) = &self.speed {
            config.passes.speed = speed.clone();
        }
        if let Some(force) = &self.force {
            config.passes.force = force.clone();
        }
        if let Some(cut_mode) = self.cut_mode {
            config.cut_mode = cut_mode;
        }
    }

    /// Sink for the plotter stream
    pub fn output_target(&self) -> OutputTarget {
        match (&self.file, &self.port) {
            (Some(path), _) => OutputTarget::File(path.clone()),
            (None, Some(port)) => OutputTarget::Serial {
                port: port.clone(),
                baud: self.baud,
            },
            (None, None) => OutputTarget::Stdout,
        }
    }

    /// `<board-stem>.svg` in the working directory
    pub fn svg_path(&self) -> Option<PathBuf> {
        let stem = self.board.as_ref()?.file_stem()?;
        Some(PathBuf::from(format!("{}.svg", stem.to_string_lossy())))
    }
}
