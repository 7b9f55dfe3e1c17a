// rlx-common/src/app_file.rs
//! Parsing of `<app_dir>/ebin/<name>.app` resource files into
//! [`AppDescriptor`]s.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, RlxError};
use crate::model::AppDescriptor;
use crate::term::{self, Term};

pub const APP_FILE_EXT: &str = "app";
pub const EBIN_DIR: &str = "ebin";

/// Path of the resource file for `name` inside an application directory.
pub fn app_file_path(app_dir: &Path, name: &str) -> PathBuf {
    app_dir.join(EBIN_DIR).join(format!("{name}.{APP_FILE_EXT}"))
}

/// Builds a glob pattern string from `full`, escaping glob metacharacters in
/// the literal `prefix` portion.
pub fn escape_prefix(prefix: &Path, full: &Path) -> String {
    let prefix_str = prefix.to_string_lossy();
    let full_str = full.to_string_lossy();
    match full_str.strip_prefix(&*prefix_str) {
        Some(rest) => format!("{}{}", glob::Pattern::escape(&prefix_str), rest),
        None => full_str.into_owned(),
    }
}

/// Reads and parses the app file at `path`.
///
/// Returns `Ok(None)` when the file is well formed but its `vsn` does not
/// match `expected_vsn`. Any read error or unexpected shape is a
/// [`RlxError::BadAppFile`].
pub fn parse_app_file(
    expected_name: &str,
    expected_vsn: Option<&str>,
    path: &Path,
) -> Result<Option<AppDescriptor>> {
    debug!(
        "Parsing app file {} for '{}' ({})",
        path.display(),
        expected_name,
        expected_vsn.unwrap_or("any version")
    );
    let source =
        fs::read_to_string(path).map_err(|e| RlxError::bad_app_file(path, e.to_string()))?;
    let terms = term::consult(&source).map_err(|e| RlxError::bad_app_file(path, e))?;

    let props = match terms.as_slice() {
        [Term::Tuple(decl)] if decl.len() == 3 && decl[0].as_atom() == Some("application") => {
            decl[2]
                .as_list()
                .ok_or_else(|| RlxError::bad_app_file(path, render(&terms)))?
        }
        _ => return Err(RlxError::bad_app_file(path, render(&terms))),
    };

    let vsn = match Term::proplist_get(props, "vsn") {
        Some(vsn) => vsn
            .as_text()
            .ok_or_else(|| RlxError::bad_app_file(path, format!("bad vsn {vsn}")))?,
        None => return Err(RlxError::bad_app_file(path, "missing vsn")),
    };

    if expected_vsn.is_some_and(|wanted| wanted != vsn) {
        debug!(
            "App file {} has vsn {} but {} was requested",
            path.display(),
            vsn,
            expected_vsn.unwrap_or_default()
        );
        return Ok(None);
    }

    let applications = app_list(props, "applications", path)?;
    let included = app_list(props, "included_applications", path)?;
    let optional = app_list(props, "optional_applications", path)?;

    Ok(Some(
        AppDescriptor::new(expected_name, vsn, app_dir_of(path))
            .with_applications(applications)
            .with_included_applications(included)
            .with_optional_applications(optional),
    ))
}

// <app_dir>/ebin/<name>.app -> <app_dir>
fn app_dir_of(path: &Path) -> PathBuf {
    path.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn app_list(props: &[Term], key: &str, path: &Path) -> Result<Vec<String>> {
    let Some(value) = Term::proplist_get(props, key) else {
        return Ok(Vec::new());
    };
    let items = value
        .as_list()
        .ok_or_else(|| RlxError::bad_app_file(path, format!("{{{key},{value}}}")))?;
    items
        .iter()
        .map(|item| {
            item.as_atom()
                .map(str::to_string)
                .ok_or_else(|| RlxError::bad_app_file(path, format!("{{{key},{value}}}")))
        })
        .collect()
}

fn render(terms: &[Term]) -> String {
    let rendered: Vec<String> = terms.iter().map(Term::to_string).collect();
    format!("[{}]", rendered.join(","))
}
