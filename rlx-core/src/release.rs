// rlx-core/src/release.rs
use std::fs;
use std::path::{Path, PathBuf};

use rlx_common::error::{Result, RlxError};
use rlx_common::term::Term;
use rlx_common::{AppDescriptor, AppRegistry, ResolveInputs, Vsn};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::locate::LookupContext;
use crate::resolve::DependencyResolver;
use crate::system_path::SystemPathRegistry;

const ERTS_PREFIX: &str = "erts-";

/// The runtime system bundled with a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Erts {
    pub vsn: String,
    pub dir: PathBuf,
}

/// A fully resolved release, ready to be written out.
#[derive(Debug, Clone, Serialize)]
pub struct Release {
    pub name: String,
    pub vsn: String,
    pub erts: Option<Erts>,
    pub applications: Vec<AppDescriptor>,
}

/// Finds the newest `<root_dir>/erts-<vsn>` directory.
pub fn find_erts(root_dir: &Path) -> Result<Erts> {
    let entries = fs::read_dir(root_dir).map_err(|e| {
        warn!("Cannot read runtime root {}: {}", root_dir.display(), e);
        RlxError::ReleaseRuntimeError(root_dir.to_path_buf())
    })?;

    let newest = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let vsn = name.strip_prefix(ERTS_PREFIX)?.to_string();
            Some((Vsn::new(vsn), entry.path()))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b));

    match newest {
        Some((vsn, dir)) => {
            debug!("Using runtime erts-{} at {}", vsn, dir.display());
            Ok(Erts {
                vsn: vsn.to_string(),
                dir,
            })
        }
        None => Err(RlxError::ReleaseRuntimeError(root_dir.to_path_buf())),
    }
}

impl Release {
    pub fn new(
        name: impl Into<String>,
        vsn: impl Into<String>,
        erts: Option<Erts>,
        applications: Vec<AppDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            vsn: vsn.into(),
            erts,
            applications,
        }
    }

    pub fn application(&self, name: &str) -> Option<&AppDescriptor> {
        self.applications.iter().find(|a| a.name() == name)
    }

    /// The `{release, ...}` term of a `.rel` file. Without a bundled runtime
    /// the erts version is left empty.
    pub fn rel_term(&self) -> Term {
        let erts_vsn = self.erts.as_ref().map(|e| e.vsn.as_str()).unwrap_or("");
        let apps = self
            .applications
            .iter()
            .map(|app| Term::Tuple(vec![Term::atom(app.name()), Term::string(app.vsn())]))
            .collect();
        Term::Tuple(vec![
            Term::atom("release"),
            Term::Tuple(vec![Term::string(&self.name), Term::string(&self.vsn)]),
            Term::Tuple(vec![Term::atom("erts"), Term::string(erts_vsn)]),
            Term::List(apps),
        ])
    }

    /// Writes `<dir>/<name>.rel` and returns its path.
    pub fn write_rel_file(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.rel", self.name));
        fs::write(&path, format!("{}.\n", self.rel_term()))?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}

/// Resolves one configured release and realizes it.
///
/// Fails with `NoGoalsSpecified` before any lookup when the release has no
/// goals. The runtime is located under `root_dir` only when
/// `inputs.include_erts` is set.
pub fn resolve_release(
    inputs: &ResolveInputs,
    registry: &AppRegistry,
    system_path: &dyn SystemPathRegistry,
    root_dir: Option<&Path>,
) -> Result<Release> {
    if inputs.goals.is_empty() {
        return Err(RlxError::NoGoalsSpecified {
            release_name: inputs.release_name.clone(),
            release_vsn: inputs.release_vsn.clone(),
        });
    }
    debug!(
        "Resolving release {}-{} ({} goals, {} lib dirs, system libs: {})",
        inputs.release_name,
        inputs.release_vsn,
        inputs.goals.len(),
        inputs.lib_dirs.len(),
        inputs.check_system_path
    );

    let context = LookupContext::new(
        registry,
        &inputs.lib_dirs,
        inputs.check_system_path,
        system_path,
    );
    let applications = DependencyResolver::new(context, &inputs.exclude).resolve_goals(&inputs.goals)?;

    let erts = match (inputs.include_erts, root_dir) {
        (true, Some(root)) => Some(find_erts(root)?),
        (true, None) => {
            return Err(RlxError::Config(
                "include_erts is set but no root_dir is configured".to_string(),
            ))
        }
        (false, _) => None,
    };

    Ok(Release::new(
        &inputs.release_name,
        &inputs.release_vsn,
        erts,
        applications,
    ))
}
