use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RlxError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("TOML Parsing Error: {0}")]
    Toml(#[from] Arc<toml::de::Error>),

    #[error("JSON Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Glob Pattern Error: {0}")]
    Pattern(#[from] Arc<glob::PatternError>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("No goals specified for release {release_name}-{release_vsn}")]
    NoGoalsSpecified {
        release_name: String,
        release_vsn: String,
    },

    #[error("Application {name} ({}) not found in any lib dir", .vsn.as_deref().unwrap_or("any version"))]
    AppNotFound { name: String, vsn: Option<String> },

    #[error("Malformed app file {}: {raw}", .path.display())]
    BadAppFile { path: PathBuf, raw: String },

    #[error("Unable to find runtime system (erts-*) under {}", .0.display())]
    ReleaseRuntimeError(PathBuf),

    #[error("Parsing Error in {0}: {1}")]
    ParseError(&'static str, String),
}

impl RlxError {
    pub fn app_not_found(name: impl Into<String>, vsn: Option<&str>) -> Self {
        RlxError::AppNotFound {
            name: name.into(),
            vsn: vsn.map(str::to_string),
        }
    }

    pub fn bad_app_file(path: impl Into<PathBuf>, raw: impl Into<String>) -> Self {
        RlxError::BadAppFile {
            path: path.into(),
            raw: raw.into(),
        }
    }
}

impl From<std::io::Error> for RlxError {
    fn from(err: std::io::Error) -> Self {
        RlxError::Io(Arc::new(err))
    }
}

impl From<toml::de::Error> for RlxError {
    fn from(err: toml::de::Error) -> Self {
        RlxError::Toml(Arc::new(err))
    }
}

impl From<serde_json::Error> for RlxError {
    fn from(err: serde_json::Error) -> Self {
        RlxError::Json(Arc::new(err))
    }
}

impl From<glob::PatternError> for RlxError {
    fn from(err: glob::PatternError) -> Self {
        RlxError::Pattern(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, RlxError>;
