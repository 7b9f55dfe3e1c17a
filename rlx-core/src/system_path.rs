// rlx-core/src/system_path.rs
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rlx_common::Vsn;
use tracing::{debug, warn};

/// System-wide lookup of an application's install directory, consulted as
/// the last tier of the locator when enabled.
pub trait SystemPathRegistry {
    fn lib_dir(&self, name: &str) -> Option<PathBuf>;
}

/// Resolves applications against `<root>/lib`, where each application lives
/// in `<name>` or `<name>-<vsn>`. When several versions are installed the
/// newest one is returned.
#[derive(Debug, Clone)]
pub struct RootLibDirs {
    root: PathBuf,
}

impl RootLibDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn lib_root(&self) -> PathBuf {
        self.root.join("lib")
    }
}

fn handle_dir_entry(res: io::Result<fs::DirEntry>, dir: &Path) -> Option<fs::DirEntry> {
    match res {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!("Error reading entry in {}: {}", dir.display(), e);
            None
        }
    }
}

impl SystemPathRegistry for RootLibDirs {
    fn lib_dir(&self, name: &str) -> Option<PathBuf> {
        let lib_root = self.lib_root();
        let entries = match fs::read_dir(&lib_root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    "[SYSTEM_PATH:{}] Cannot read {}: {}",
                    name,
                    lib_root.display(),
                    e
                );
                return None;
            }
        };

        let prefix = format!("{name}-");
        let mut newest: Option<(Option<Vsn>, PathBuf)> = None;
        for entry in entries.filter_map(|res| handle_dir_entry(res, &lib_root)) {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(dir_name) = file_name.to_str() else {
                continue;
            };
            // An unversioned directory sorts below any versioned one.
            let vsn = if dir_name == name {
                None
            } else if let Some(vsn) = dir_name.strip_prefix(&prefix) {
                Some(Vsn::new(vsn))
            } else {
                continue;
            };
            debug!("[SYSTEM_PATH:{}] Candidate {}", name, path.display());
            if newest.as_ref().is_none_or(|(best, _)| vsn > *best) {
                newest = Some((vsn, path));
            }
        }

        match newest {
            Some((_, path)) => {
                debug!("[SYSTEM_PATH:{}] Using {}", name, path.display());
                Some(path)
            }
            None => {
                debug!("[SYSTEM_PATH:{}] Not installed under {}", name, lib_root.display());
                None
            }
        }
    }
}

impl SystemPathRegistry for HashMap<String, PathBuf> {
    fn lib_dir(&self, name: &str) -> Option<PathBuf> {
        self.get(name).cloned()
    }
}

/// A registry that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSystemPath;

impl SystemPathRegistry for NoSystemPath {
    fn lib_dir(&self, _name: &str) -> Option<PathBuf> {
        None
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn picks_newest_versioned_dir() {
        let tmp = TempDir::new().unwrap();
        for dir in ["stdlib-3.9", "stdlib-3.10", "stdlib_extra-9.0", "kernel"] {
            fs::create_dir_all(tmp.path().join("lib").join(dir)).unwrap();
        }
        fs::write(tmp.path().join("lib").join("stdlib-99.0"), "not a dir").unwrap();

        let libs = RootLibDirs::new(tmp.path());
        assert_eq!(
            libs.lib_dir("stdlib"),
            Some(tmp.path().join("lib").join("stdlib-3.10"))
        );
        assert_eq!(
            libs.lib_dir("kernel"),
            Some(tmp.path().join("lib").join("kernel"))
        );
        assert_eq!(libs.lib_dir("crypto"), None);
    }

    #[test]
    fn missing_root_finds_nothing() {
        let libs = RootLibDirs::new("/definitely/not/here");
        assert_eq!(libs.lib_dir("kernel"), None);
        assert_eq!(NoSystemPath.lib_dir("kernel"), None);
    }
}
