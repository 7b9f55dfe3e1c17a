use clap::Args;
use colored::Colorize;
use rlx_common::config::Config;
use rlx_common::error::{Result, RlxError};
use rlx_common::Goal;
use rlx_core::LookupContext;

use crate::cli::{load_registry, system_path};

#[derive(Args, Debug)]
pub struct Locate {
    /// Application to look up, as NAME or NAME@VSN
    pub app: Goal,

    /// Do not fall back to the runtime's own lib directory
    #[arg(long)]
    pub no_system_libs: bool,
}

impl Locate {
    pub fn run(&self, config: &Config) -> Result<()> {
        let registry = load_registry(config)?;
        let system_path = system_path(config);
        let context = LookupContext::new(
            &registry,
            &config.lib_dirs,
            config.system_libs && !self.no_system_libs,
            system_path.as_ref(),
        );

        match context.locate(&self.app.name, self.app.vsn.as_deref())? {
            Some(app) => {
                println!("{} {}", app.name().green().bold(), app.vsn());
                println!("  {}", app.dir().display());
                if !app.applications().is_empty() {
                    println!("  applications: {}", app.applications().join(", "));
                }
                if !app.included_applications().is_empty() {
                    println!(
                        "  included_applications: {}",
                        app.included_applications().join(", ")
                    );
                }
                if !app.optional_applications().is_empty() {
                    println!(
                        "  optional_applications: {}",
                        app.optional_applications().join(", ")
                    );
                }
                Ok(())
            }
            None => Err(RlxError::app_not_found(
                &self.app.name,
                self.app.vsn.as_deref(),
            )),
        }
    }
}
