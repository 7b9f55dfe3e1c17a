// rlx/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use rlx_common::config::Config;
use rlx_common::error::{Result as rlxResult, RlxError};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::CliArgs;

fn init_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("RLX_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

fn main() -> rlxResult<()> {
    let cli_args = CliArgs::parse();
    init_logging(cli_args.verbose);

    let config = match Config::load(cli_args.config.as_deref()) {
        Ok(config) => config,
        Err(e @ RlxError::Config(_)) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{}: Could not load config: {:#}", "Error".red().bold(), e);
            process::exit(1);
        }
    };

    if let Err(e) = cli_args.command.run(&config) {
        error!("Command failed: {:#}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }

    debug!("Command completed successfully.");
    Ok(())
}
