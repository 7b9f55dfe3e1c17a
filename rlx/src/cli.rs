// rlx/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use rlx_common::config::Config;
use rlx_common::error::Result;
use rlx_common::AppRegistry;
use rlx_core::{NoSystemPath, RootLibDirs, SystemPathRegistry};
use tracing::debug;

pub mod locate;
pub mod release;
pub mod resolve;

use crate::cli::locate::Locate;
use crate::cli::release::ReleaseArgs;
use crate::cli::resolve::Resolve;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "rlx", bin_name = "rlx")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the configuration file (defaults to ./rlx.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Resolve(Resolve),
    Locate(Locate),
    Release(ReleaseArgs),
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Resolve(command) => command.run(config),
            Self::Locate(command) => command.run(config),
            Self::Release(command) => command.run(config),
        }
    }
}

/// Scans the configured project app dirs into the registry.
pub(crate) fn load_registry(config: &Config) -> Result<AppRegistry> {
    let registry = AppRegistry::scan(&config.app_dirs)?;
    debug!("Registry holds {} project apps", registry.len());
    Ok(registry)
}

pub(crate) fn system_path(config: &Config) -> Box<dyn SystemPathRegistry> {
    match &config.root_dir {
        Some(root) => Box::new(RootLibDirs::new(root)),
        None => {
            debug!("No root_dir configured, system libs cannot be found");
            Box::new(NoSystemPath)
        }
    }
}
