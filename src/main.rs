use anyhow::Context;
use clap::{CommandFactory, Parser};
use kicadcut::cli::Cli;
use kicadcut::communication::{list_ports, open_output};
use kicadcut::settings::{default_config_path, RunConfig};
use kicadcut::{init_logging, load_strokes, StencilJob};
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, info};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{:#}", e);
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => default_config_path().ok().filter(|path| path.is_file()),
    };

    let mut config = match path {
        Some(path) => RunConfig::load_from_file(&path)
            .with_context(|| format!("Cannot load settings from {}", path.display()))?,
        None => RunConfig::new(),
    };
    cli.apply_to(&mut config);

    let config = config.normalized();
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    if cli.list_ports {
        for port in list_ports()? {
            println!("{}\t{}", port.port_name, port.description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(cli)?;
    debug!("Effective settings: {:?}", config);

    if let Some(path) = &cli.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Cannot save settings to {}", path.display()))?;
        info!("Settings saved to {}", path.display());
    }

    let (board, layer) = match (&cli.board, &cli.layer) {
        (Some(board), Some(layer)) => (board, layer),
        _ if cli.save_config.is_some() => return Ok(ExitCode::SUCCESS),
        _ => {
            eprintln!("{}", Cli::command().render_usage());
            return Ok(ExitCode::FAILURE);
        }
    };

    // Input problems must surface before the device sees a single byte
    let strokes = load_strokes(&config, board, layer)?;
    let job = StencilJob::prepare(&config, strokes);

    let target = cli.output_target();
    let writer = open_output(&target).with_context(|| format!("Cannot open {}", target))?;
    let mut writer = job.cut(&config, writer)?;
    writer.flush()?;
    info!("Plotter stream written to {}", target);

    eprintln!("{}", job.summary());

    if cli.svg {
        if let Some(path) = cli.svg_path() {
            let title = board.display().to_string();
            job.export_svg(&config, &path, &title, layer)?;
            info!("SVG written to {}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
