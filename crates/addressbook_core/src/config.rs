//! Application settings loading.
//!
//! # Responsibility
//! - Read named connection strings from a JSON settings file.
//!
//! # Invariants
//! - Settings are passed explicitly to stores; nothing is cached globally.
//!
//! Expected file shape:
//!
//! ```json
//! { "ConnectionStrings": { "Default": "Data Source=contacts.db" } }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Name of the connection string used when none is given.
pub const DEFAULT_CONNECTION_NAME: &str = "Default";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    MissingConnectionString(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read settings `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid settings `{}`: {source}", path.display())
            }
            Self::MissingConnectionString(name) => {
                write!(f, "no connection string named `{name}` found")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::MissingConnectionString(_) => None,
        }
    }
}

/// Parsed settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppSettings {
    #[serde(rename = "ConnectionStrings", default)]
    connection_strings: BTreeMap<String, String>,
}

impl AppSettings {
    /// Loads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the named connection string.
    ///
    /// Blank values count as missing.
    pub fn connection_string(&self, name: &str) -> Result<&str, ConfigError> {
        self.connection_strings
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingConnectionString(name.to_string()))
    }
}
