#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rlx_common::AppDescriptor;
use tempfile::TempDir;

/// Installs `<dir>/<name>-<vsn>/ebin/<name>.app` and returns the app dir.
pub fn install_app(
    lib_dir: &Path,
    name: &str,
    vsn: &str,
    applications: &[&str],
    optional: &[&str],
) -> PathBuf {
    let app_dir = lib_dir.join(format!("{name}-{vsn}"));
    write_app_file(&app_dir, name, vsn, applications, optional);
    app_dir
}

pub fn write_app_file(
    app_dir: &Path,
    name: &str,
    vsn: &str,
    applications: &[&str],
    optional: &[&str],
) {
    let ebin = app_dir.join("ebin");
    fs::create_dir_all(&ebin).unwrap();
    fs::write(
        ebin.join(format!("{name}.app")),
        format!(
            "{{application, {name}, [\n  {{vsn, \"{vsn}\"}},\n  {{applications, [{}]}},\n  {{optional_applications, [{}]}}\n]}}.\n",
            applications.join(", "),
            optional.join(", ")
        ),
    )
    .unwrap();
}

pub fn lib_dir() -> TempDir {
    TempDir::new().unwrap()
}

pub fn app(name: &str, vsn: &str, applications: &[&str]) -> AppDescriptor {
    AppDescriptor::new(name, vsn, format!("/project/apps/{name}"))
        .with_applications(applications.to_vec())
}

pub fn names(apps: &[AppDescriptor]) -> Vec<&str> {
    apps.iter().map(AppDescriptor::name).collect()
}
