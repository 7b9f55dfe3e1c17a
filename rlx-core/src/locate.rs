// rlx-core/src/locate.rs
//! Finds a single application by name and optional version.
//!
//! Three tiers are tried in order and the first hit wins:
//!
//! 1. the caller-supplied [`AppRegistry`],
//! 2. each lib dir, scanned for `<lib_dir>/*/ebin/<name>.app`,
//! 3. the system path registry, only when `check_system_path` is set.
use std::path::{Path, PathBuf};

use rlx_common::app_file::{self, escape_prefix, APP_FILE_EXT, EBIN_DIR};
use rlx_common::error::Result;
use rlx_common::{AppDescriptor, AppRegistry};
use tracing::{debug, warn};

use crate::system_path::SystemPathRegistry;

/// Read-only inputs shared by every lookup of one resolution.
pub struct LookupContext<'a> {
    pub registry: &'a AppRegistry,
    pub lib_dirs: &'a [PathBuf],
    pub check_system_path: bool,
    pub system_path: &'a dyn SystemPathRegistry,
}

impl<'a> LookupContext<'a> {
    pub fn new(
        registry: &'a AppRegistry,
        lib_dirs: &'a [PathBuf],
        check_system_path: bool,
        system_path: &'a dyn SystemPathRegistry,
    ) -> Self {
        Self {
            registry,
            lib_dirs,
            check_system_path,
            system_path,
        }
    }

    /// Locates `name`, constrained to `vsn` when given.
    ///
    /// `Ok(None)` means no tier had a matching application. A malformed app
    /// file met on the way is an error, never a miss.
    pub fn locate(&self, name: &str, vsn: Option<&str>) -> Result<Option<AppDescriptor>> {
        if let Some(app) = self.from_registry(name, vsn) {
            return Ok(Some(app));
        }
        if let Some(app) = self.from_lib_dirs(name, vsn)? {
            return Ok(Some(app));
        }
        if !self.check_system_path {
            debug!(
                "[LOCATE:{}] Not in lib dirs and system libs are disabled",
                name
            );
            return Ok(None);
        }
        self.from_system_path(name, vsn)
    }

    fn from_registry(&self, name: &str, vsn: Option<&str>) -> Option<AppDescriptor> {
        match self.registry.get(name) {
            Some(app) if app.matches_vsn(vsn) => {
                debug!("[LOCATE:{}] Found {} in registry", name, app);
                Some(app.clone())
            }
            Some(app) => {
                debug!(
                    "[LOCATE:{}] Registry has {} but {} was requested, searching lib dirs",
                    name,
                    app.vsn(),
                    vsn.unwrap_or_default()
                );
                None
            }
            None => None,
        }
    }

    fn from_lib_dirs(&self, name: &str, vsn: Option<&str>) -> Result<Option<AppDescriptor>> {
        for dir in self.lib_dirs {
            if let Some(app) = search_lib_dir(dir, name, vsn)? {
                debug!("[LOCATE:{}] Found {} in {}", name, app, dir.display());
                return Ok(Some(app));
            }
        }
        Ok(None)
    }

    fn from_system_path(&self, name: &str, vsn: Option<&str>) -> Result<Option<AppDescriptor>> {
        let Some(app_dir) = self.system_path.lib_dir(name) else {
            debug!("[LOCATE:{}] Not known to the system path registry", name);
            return Ok(None);
        };
        let path = app_file::app_file_path(&app_dir, name);
        let found = app_file::parse_app_file(name, vsn, &path)?;
        match &found {
            Some(app) => debug!("[LOCATE:{}] Found {} on the system path", name, app),
            None => debug!(
                "[LOCATE:{}] System copy at {} does not match {}",
                name,
                app_dir.display(),
                vsn.unwrap_or_default()
            ),
        }
        Ok(found)
    }
}

/// Scans one lib dir for `*/ebin/<name>.app`, candidates in alphabetical
/// order, and returns the first whose version matches.
pub fn search_lib_dir(dir: &Path, name: &str, vsn: Option<&str>) -> Result<Option<AppDescriptor>> {
    let pattern = escape_prefix(
        dir,
        &dir.join("*")
            .join(EBIN_DIR)
            .join(format!("{}.{APP_FILE_EXT}", glob::Pattern::escape(name))),
    );
    debug!("[LOCATE:{}] Scanning {}", name, pattern);

    for entry in glob::glob(&pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Error reading {}: {}. Skipping entry.", e.path().display(), e);
                continue;
            }
        };
        if let Some(app) = app_file::parse_app_file(name, vsn, &path)? {
            return Ok(Some(app));
        }
    }
    Ok(None)
}

/// One-shot lookup without building a [`LookupContext`] first.
pub fn locate(
    name: &str,
    vsn: Option<&str>,
    registry: &AppRegistry,
    lib_dirs: &[PathBuf],
    check_system_path: bool,
    system_path: &dyn SystemPathRegistry,
) -> Result<Option<AppDescriptor>> {
    LookupContext::new(registry, lib_dirs, check_system_path, system_path).locate(name, vsn)
}
