mod args;
mod config;
mod platform;

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::{engine_info, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

use args::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args).context("initializing logging")?;

    let mut config = match &args.config {
        Some(path) => config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => config::AppConfig::default(),
    };
    args.apply(&mut config);
    engine_info!("Starting with {:?}", config);

    let mode = if args.once {
        platform::RunMode::Once
    } else {
        platform::RunMode::Interactive
    };
    platform::run_app(config, mode)
}

fn init_logging(args: &Args) -> Result<()> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let file = args
        .log_file
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILE.into());
    let destination = if args.verbose {
        LogDestination::Both(file)
    } else {
        LogDestination::File(file)
    };
    let destination = engine_logging::initialize_or_fallback(destination, level)?;
    engine_info!("Logging to {:?}", destination);
    Ok(())
}
