use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use rlx_common::config::Config;
use rlx_common::error::Result;
use rlx_core::resolve_release;

use crate::cli::resolve::print_release;
use crate::cli::{load_registry, system_path};

#[derive(Args, Debug)]
pub struct ReleaseArgs {
    /// Release to build
    pub release: String,

    /// Release version, when several versions of the release are configured
    #[arg(long)]
    pub vsn: Option<String>,

    /// Directory the .rel file is written to
    #[arg(short, long, default_value = "_rel")]
    pub output: PathBuf,
}

impl ReleaseArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let inputs = config.release_inputs(&self.release, self.vsn.as_deref())?;
        let registry = load_registry(config)?;
        let system_path = system_path(config);

        let release = resolve_release(
            &inputs,
            &registry,
            system_path.as_ref(),
            config.root_dir.as_deref(),
        )?;
        print_release(&release);
        if let Some(erts) = &release.erts {
            println!("runtime: erts-{} ({})", erts.vsn, erts.dir.display());
        }

        let out_dir = self.output.join(&release.name).join(&release.vsn);
        let rel_file = release.write_rel_file(&out_dir)?;
        println!(
            "{}{} {}",
            "==> ".bold().blue(),
            "Wrote".bold(),
            rel_file.display()
        );
        Ok(())
    }
}
