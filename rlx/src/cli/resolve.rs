use clap::Args;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};
use rlx_common::config::Config;
use rlx_common::error::{Result, RlxError};
use rlx_core::{resolve_release, Release};

use crate::cli::{load_registry, system_path};

#[derive(Args, Debug)]
pub struct Resolve {
    /// Release to resolve; all configured releases when omitted
    pub release: Option<String>,

    /// Release version, when several versions of the release are configured
    #[arg(long, requires = "release")]
    pub vsn: Option<String>,

    /// Print the resolved applications as JSON
    #[arg(long)]
    pub json: bool,
}

impl Resolve {
    pub fn run(&self, config: &Config) -> Result<()> {
        let targets: Vec<(String, Option<String>)> = match &self.release {
            Some(name) => vec![(name.clone(), self.vsn.clone())],
            None => config
                .releases
                .iter()
                .map(|r| (r.name.clone(), Some(r.vsn.clone())))
                .collect(),
        };
        if targets.is_empty() {
            return Err(RlxError::Config(
                "No releases are defined in the configuration".to_string(),
            ));
        }

        let registry = load_registry(config)?;
        let system_path = system_path(config);

        let mut releases = Vec::new();
        for (name, vsn) in &targets {
            let mut inputs = config.release_inputs(name, vsn.as_deref())?;
            // Resolution only, the runtime is not needed here.
            inputs.include_erts = false;
            tracing::debug!("Resolving release {}-{}", inputs.release_name, inputs.release_vsn);
            releases.push(resolve_release(&inputs, &registry, system_path.as_ref(), None)?);
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&releases)?);
        } else {
            for release in &releases {
                print_release(release);
            }
        }
        Ok(())
    }
}

pub(crate) fn print_release(release: &Release) {
    println!(
        "{}{} {}",
        "==> ".bold().blue(),
        release.name.bold(),
        release.vsn
    );
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.add_row(Row::new(vec![
        Cell::new("#").style_spec("b"),
        Cell::new("Application").style_spec("b"),
        Cell::new("Version").style_spec("b"),
        Cell::new("Directory").style_spec("b"),
        Cell::new("Source").style_spec("b"),
    ]));
    for (i, app) in release.applications.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&(i + 1).to_string()),
            Cell::new(app.name()).style_spec("Fg"),
            Cell::new(app.vsn()),
            Cell::new(&app.dir().display().to_string()),
            Cell::new(if app.is_linked() { "project" } else { "lib" }),
        ]));
    }
    table.printstd();
    println!(
        "{} applications",
        release.applications.len().to_string().bold()
    );
}
