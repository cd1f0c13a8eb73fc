//! Tox Event Replay CLI Application
//!
//! Replays recorded native event batches through the tox-dispatch
//! dispatchers and reports what a listener would have seen:
//! - Per-category event counts, in dispatch order
//! - Friends referenced and the last call state received
//! - Optional event log (TXT/JSON)

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod config;
mod events;
mod replay;
mod report;
mod state;

use config::{AppConfig, OutputFormat};

/// Tox Event Replay - Dispatch recorded event batches
#[derive(Parser, Debug)]
#[command(name = "tox-replay")]
#[command(about = "Replay recorded Tox event batches through the dispatcher", long_about = None)]
#[command(version)]
struct Args {
    /// Core event batch file (can be repeated, replayed in order)
    #[arg(long, value_name = "FILE")]
    core: Vec<PathBuf>,

    /// Audio/video event batch file (can be repeated, replayed in order)
    #[arg(long, value_name = "FILE")]
    av: Vec<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of batches to replay
    #[arg(long, value_name = "COUNT")]
    max_batches: Option<usize>,

    /// Include every dispatched event in the report
    #[arg(long)]
    events: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Tox Event Replay v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using dispatch library v{}", tox_dispatch::VERSION);

    let config = build_config(&args)?;
    config.validate()?;

    let report = replay::run(&config)?;
    report::write_report(&report, config.output.format, config.output.output_file.as_deref())?;

    Ok(())
}

/// Merge the config file (if any) with command-line flags
///
/// Batch files given on the command line are appended to the configured
/// ones; every other flag overrides its config counterpart.
fn build_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    config.input.core.extend(args.core.iter().cloned());
    config.input.av.extend(args.av.iter().cloned());

    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(output) = &args.output {
        config.output.output_file = Some(output.clone());
    }
    if args.events {
        config.output.include_events = true;
    }
    if args.max_batches.is_some() {
        config.replay.max_batches = args.max_batches;
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
