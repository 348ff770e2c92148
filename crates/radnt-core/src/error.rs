//! Error types for radnt-core

use thiserror::Error;

/// Result type alias using radnt-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Radnt
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration values
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Invalid catalog definition
    #[error("Invalid component catalog: {message}")]
    InvalidCatalog { message: String },

    /// Duplicate catalog entry
    #[error("Duplicate component in catalog: {name}")]
    DuplicateEntry { name: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid catalog error
    pub fn invalid_catalog(message: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            message: message.into(),
        }
    }

    /// Create a duplicate entry error
    pub fn duplicate_entry(name: impl Into<String>) -> Self {
        Self::DuplicateEntry { name: name.into() }
    }
}
