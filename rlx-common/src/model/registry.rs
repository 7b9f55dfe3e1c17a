use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::app_file::{self, escape_prefix, APP_FILE_EXT, EBIN_DIR};
use crate::error::Result;
use crate::model::AppDescriptor;

/// Applications already known before resolution starts, keyed by name.
///
/// Typically filled by scanning the project's own application directories.
/// The resolver only reads from it.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    apps: HashMap<String, AppDescriptor>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor, replacing any previous entry of the same name.
    pub fn insert(&mut self, app: AppDescriptor) -> Option<AppDescriptor> {
        self.apps.insert(app.name().to_string(), app)
    }

    pub fn get(&self, name: &str) -> Option<&AppDescriptor> {
        self.apps.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Scans each directory for `*/ebin/*.app` and registers every
    /// application found, marked as linked. Directories are visited in order
    /// and the first occurrence of a name wins. A malformed app file aborts
    /// the scan.
    pub fn scan(dirs: &[PathBuf]) -> Result<Self> {
        let mut registry = Self::new();
        for dir in dirs {
            if !dir.is_dir() {
                warn!("Project app directory {} does not exist, skipping", dir.display());
                continue;
            }
            let pattern = dir
                .join("*")
                .join(EBIN_DIR)
                .join(format!("*.{APP_FILE_EXT}"));
            let pattern = escape_prefix(dir, &pattern);
            debug!("Scanning for project apps with pattern {}", pattern);

            for entry in glob::glob(&pattern)? {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        warn!("Error reading {}: {}. Skipping entry.", e.path().display(), e);
                        continue;
                    }
                };
                let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if registry.contains(name) {
                    debug!("'{}' already registered, ignoring {}", name, path.display());
                    continue;
                }
                if let Some(app) = app_file::parse_app_file(name, None, &path)? {
                    let app = app.linked(true);
                    debug!("Registered project app {} from {}", app, app.dir().display());
                    registry.insert(app);
                }
            }
        }
        Ok(registry)
    }
}

impl FromIterator<AppDescriptor> for AppRegistry {
    fn from_iter<I: IntoIterator<Item = AppDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        for app in iter {
            registry.insert(app);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;

    fn write_app(dir: &Path, name: &str, vsn: &str) {
        let ebin = dir.join(format!("{name}-{vsn}")).join(EBIN_DIR);
        fs::create_dir_all(&ebin).unwrap();
        fs::write(
            ebin.join(format!("{name}.app")),
            format!("{{application, {name}, [{{vsn, \"{vsn}\"}}]}}."),
        )
        .unwrap();
    }

    #[test]
    fn scan_registers_first_occurrence() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_app(first.path(), "alpha", "1.0");
        write_app(second.path(), "alpha", "2.0");
        write_app(second.path(), "beta", "0.3");

        let registry = AppRegistry::scan(&[
            first.path().to_path_buf(),
            second.path().join("missing"),
            second.path().to_path_buf(),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("alpha").map(AppDescriptor::vsn), Some("1.0"));
        assert_eq!(registry.get("beta").map(AppDescriptor::vsn), Some("0.3"));
        assert!(registry.get("alpha").is_some_and(AppDescriptor::is_linked));
    }
}
