// rlx-common/src/config.rs
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use serde::Deserialize;
use tracing::debug;

use super::error::{Result, RlxError};
use super::model::Goal;

pub const DEFAULT_CONFIG_FILENAME: &str = "rlx.toml";
const ENV_LIB_DIRS: &str = "RLX_LIB_DIRS";
const ENV_ROOT: &str = "RLX_ROOT";

/// One `[[release]]` entry of the config file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReleaseConfig {
    pub name: String,
    pub vsn: String,
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Searched before the global lib dirs.
    #[serde(default)]
    pub lib_dirs: Vec<PathBuf>,
    /// Added to the global exclude set.
    #[serde(default)]
    pub exclude_apps: Vec<String>,
    pub system_libs: Option<bool>,
    pub include_erts: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// Project application directories scanned into the registry.
    #[serde(default)]
    pub app_dirs: Vec<PathBuf>,
    /// Ordered fallback search path.
    #[serde(default)]
    pub lib_dirs: Vec<PathBuf>,
    /// Whether the runtime's own lib directory is consulted last.
    #[serde(default = "default_true")]
    pub system_libs: bool,
    #[serde(default = "default_true")]
    pub include_erts: bool,
    /// Runtime root holding `lib/` and `erts-*`.
    pub root_dir: Option<PathBuf>,
    #[serde(default)]
    pub exclude_apps: Vec<String>,
    #[serde(default, rename = "release")]
    pub releases: Vec<ReleaseConfig>,
}

/// Everything the resolver needs for a single release, after merging the
/// global settings with the release's own overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveInputs {
    pub release_name: String,
    pub release_vsn: String,
    pub goals: Vec<Goal>,
    pub lib_dirs: Vec<PathBuf>,
    pub check_system_path: bool,
    pub include_erts: bool,
    pub exclude: HashSet<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_dirs: Vec::new(),
            lib_dirs: Vec::new(),
            system_libs: true,
            include_erts: true,
            root_dir: None,
            exclude_apps: Vec::new(),
            releases: Vec::new(),
        }
    }
}

impl Config {
    /// Loads `path`, or `./rlx.toml` if it exists, or the defaults. Environment
    /// overrides are applied in every case.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        debug!("Loading rlx configuration");

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    debug!(
                        "No {} in current directory, using default configuration",
                        DEFAULT_CONFIG_FILENAME
                    );
                    Self::default()
                }
            }
        };

        config.apply_env(
            env::var_os(ENV_LIB_DIRS).as_deref(),
            env::var_os(ENV_ROOT).as_deref(),
        );
        config.expand_home();

        debug!("Configuration loaded successfully.");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration from {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| {
            RlxError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env(&mut self, lib_dirs: Option<&std::ffi::OsStr>, root: Option<&std::ffi::OsStr>) {
        if let Some(extra) = lib_dirs {
            let extra: Vec<PathBuf> = env::split_paths(extra)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            debug!("Appending {} lib dirs from {}", extra.len(), ENV_LIB_DIRS);
            self.lib_dirs.extend(extra);
        }
        if self.root_dir.is_none() {
            if let Some(root) = root.filter(|r| !r.is_empty()) {
                debug!("Runtime root taken from {}: {}", ENV_ROOT, Path::new(root).display());
                self.root_dir = Some(PathBuf::from(root));
            }
        }
    }

    fn expand_home(&mut self) {
        let home = UserDirs::new().map(|ud| ud.home_dir().to_path_buf());
        let Some(home) = home else {
            return;
        };
        let expand = |p: &mut PathBuf| {
            if let Ok(rest) = p.strip_prefix("~") {
                *p = home.join(rest);
            }
        };
        self.app_dirs.iter_mut().for_each(expand);
        self.lib_dirs.iter_mut().for_each(expand);
        for release in &mut self.releases {
            release.lib_dirs.iter_mut().for_each(expand);
        }
        if let Some(root) = self.root_dir.as_mut() {
            expand(root);
        }
    }

    /// Finds a release by name, and by version when one is given. Without a
    /// version the last matching entry wins, so later entries act as upgrades.
    pub fn release(&self, name: &str, vsn: Option<&str>) -> Option<&ReleaseConfig> {
        self.releases
            .iter()
            .rev()
            .find(|r| r.name == name && vsn.is_none_or(|v| v == r.vsn))
    }

    /// Merges the global settings with the overrides of one release.
    pub fn release_inputs(&self, name: &str, vsn: Option<&str>) -> Result<ResolveInputs> {
        let release = self.release(name, vsn).ok_or_else(|| {
            RlxError::Config(format!(
                "Release '{name}'{} is not defined in the configuration",
                vsn.map(|v| format!(" version {v}")).unwrap_or_default()
            ))
        })?;

        let lib_dirs = release
            .lib_dirs
            .iter()
            .chain(&self.lib_dirs)
            .cloned()
            .collect();
        let exclude = self
            .exclude_apps
            .iter()
            .chain(&release.exclude_apps)
            .cloned()
            .collect();

        Ok(ResolveInputs {
            release_name: release.name.clone(),
            release_vsn: release.vsn.clone(),
            goals: release.goals.clone(),
            lib_dirs,
            check_system_path: release.system_libs.unwrap_or(self.system_libs),
            include_erts: release.include_erts.unwrap_or(self.include_erts),
            exclude,
        })
    }
}
