use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, RlxError};

/// A requested top-level application, optionally pinned to a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Goal {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsn: Option<String>,
}

impl Goal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vsn: None,
        }
    }

    pub fn with_vsn(name: impl Into<String>, vsn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vsn: Some(vsn.into()),
        }
    }

    /// Parses `name` or `name@vsn`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, vsn) = match s.split_once('@') {
            Some((name, vsn)) => (name.trim(), Some(vsn.trim())),
            None => (s, None),
        };
        if name.is_empty() {
            return Err(RlxError::ParseError(
                "goal",
                format!("missing application name in '{s}'"),
            ));
        }
        match vsn {
            Some("") => Err(RlxError::ParseError(
                "goal",
                format!("empty version in '{s}'"),
            )),
            Some(vsn) => Ok(Goal::with_vsn(name, vsn)),
            None => Ok(Goal::new(name)),
        }
    }
}

impl FromStr for Goal {
    type Err = RlxError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Goal::parse(s)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.vsn {
            Some(vsn) => write!(f, "{}@{}", self.name, vsn),
            None => write!(f, "{}", self.name),
        }
    }
}

// Goals appear in config either as "name"/"name@vsn" strings or as tables.
impl<'de> Deserialize<'de> for Goal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawGoal {
            Short(String),
            Table { name: String, vsn: Option<String> },
        }

        match RawGoal::deserialize(deserializer)? {
            RawGoal::Short(s) => Goal::parse(&s).map_err(serde::de::Error::custom),
            RawGoal::Table { name, vsn } => Ok(Goal { name, vsn }),
        }
    }
}
