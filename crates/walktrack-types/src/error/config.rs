//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("Config I/O error at {path}: {message}")]
    Io {
        /// Filesystem path of the config file
        path: String,
        /// Description of the I/O failure
        message: String,
    },

    /// Config file parse error
    #[error("Config parse error: {message}")]
    Parse {
        /// Description of the parse failure
        message: String,
    },

    /// Config validation error (invalid values)
    #[error("Config validation error: {message}")]
    Invalid {
        /// Description of the validation failure
        message: String,
    },

    /// No platform config directory is available
    #[error("Config directory not found")]
    NoConfigDir,
}

impl ConfigError {
    /// Create a parse error from a serde_json error.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::Parse { message: e.to_string() }
    }

    /// Create an I/O error for the given path.
    pub fn from_io_error(path: &std::path::Path, e: &std::io::Error) -> Self {
        Self::Io { path: path.display().to_string(), message: e.to_string() }
    }
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Invalid { message: e.to_string() }
    }
}
