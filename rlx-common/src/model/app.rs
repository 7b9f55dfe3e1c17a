use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A parsed application: its version, the three dependency lists from its
/// `.app` file and the directory it was found in.
///
/// Descriptors are immutable once built. Use [`AppDescriptor::new`] and the
/// `with_*` methods to assemble one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    name: String,
    vsn: String,
    #[serde(default)]
    applications: Vec<String>,
    #[serde(default)]
    included_applications: Vec<String>,
    #[serde(default)]
    optional_applications: Vec<String>,
    dir: PathBuf,
    #[serde(default)]
    link: bool,
}

impl AppDescriptor {
    pub fn new(name: impl Into<String>, vsn: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            vsn: vsn.into(),
            applications: Vec::new(),
            included_applications: Vec::new(),
            optional_applications: Vec::new(),
            dir: dir.into(),
            link: false,
        }
    }

    pub fn with_applications<I, S>(mut self, apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applications = apps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_included_applications<I, S>(mut self, apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.included_applications = apps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_optional_applications<I, S>(mut self, apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_applications = apps.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the descriptor as symlinked into the release rather than copied.
    pub fn linked(mut self, link: bool) -> Self {
        self.link = link;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vsn(&self) -> &str {
        &self.vsn
    }

    pub fn applications(&self) -> &[String] {
        &self.applications
    }

    pub fn included_applications(&self) -> &[String] {
        &self.included_applications
    }

    pub fn optional_applications(&self) -> &[String] {
        &self.optional_applications
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_linked(&self) -> bool {
        self.link
    }

    /// Whether this descriptor satisfies a version constraint. `None` matches
    /// any version; otherwise the strings must be equal.
    pub fn matches_vsn(&self, vsn: Option<&str>) -> bool {
        vsn.is_none_or(|wanted| wanted == self.vsn)
    }

    /// Required, included and optional dependencies, in that order.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &str> {
        self.applications
            .iter()
            .chain(&self.included_applications)
            .chain(&self.optional_applications)
            .map(String::as_str)
    }

    pub fn is_optional_dependency(&self, name: &str) -> bool {
        self.optional_applications.iter().any(|o| o == name)
    }
}

impl fmt::Display for AppDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.vsn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_are_chained_in_declaration_order() {
        let app = AppDescriptor::new("web", "1.0", "/lib/web-1.0")
            .with_applications(["kernel", "stdlib"])
            .with_included_applications(["web_sup"])
            .with_optional_applications(["telemetry"]);

        let deps: Vec<&str> = app.all_dependencies().collect();
        assert_eq!(deps, vec!["kernel", "stdlib", "web_sup", "telemetry"]);
        assert!(app.is_optional_dependency("telemetry"));
        assert!(!app.is_optional_dependency("kernel"));
    }

    #[test]
    fn version_constraint_is_exact_or_absent() {
        let app = AppDescriptor::new("web", "1.0", "/lib/web-1.0");
        assert!(app.matches_vsn(None));
        assert!(app.matches_vsn(Some("1.0")));
        assert!(!app.matches_vsn(Some("1.0.0")));
        assert!(!app.is_linked());
        assert_eq!(app.to_string(), "web-1.0");
    }
}
