//! Error types for radnt-dev

use thiserror::Error;

/// Result type alias using radnt-dev's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Development server error types
#[derive(Error, Debug)]
pub enum Error {
    /// No package.json in the project root
    #[error("No package.json found in {path}. Make sure you're in a project directory")]
    PackageJsonMissing { path: String },

    /// package.json does not depend on next
    #[error("{path} doesn't appear to be a Next.js project. Run \"radnt create\" to create a new project")]
    NotNextProject { path: String },

    /// Port search ran past 65535
    #[error("No available port found starting from {start} on {host}")]
    NoAvailablePort { host: String, start: u16 },

    /// Child process could not be started
    #[error("Failed to start {command}: {message}")]
    ProcessSpawn { command: String, message: String },

    /// Command took longer than allowed
    #[error("Command timed out after {secs}s: {command}")]
    CommandTimeout { command: String, secs: u64 },

    /// Invalid watch pattern
    #[error("Invalid watch pattern: {0}")]
    Glob(#[from] globset::Error),

    /// JSON parsing error
    #[error("Invalid package.json: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Background task failed
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a package.json missing error
    pub fn package_json_missing(path: impl Into<String>) -> Self {
        Self::PackageJsonMissing { path: path.into() }
    }

    /// Create a not-a-Next.js-project error
    pub fn not_next_project(path: impl Into<String>) -> Self {
        Self::NotNextProject { path: path.into() }
    }

    /// Create a no available port error
    pub fn no_available_port(host: impl Into<String>, start: u16) -> Self {
        Self::NoAvailablePort {
            host: host.into(),
            start,
        }
    }

    /// Create a process spawn error
    pub fn process_spawn(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProcessSpawn {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a command timeout error
    pub fn command_timeout(command: impl Into<String>, secs: u64) -> Self {
        Self::CommandTimeout {
            command: command.into(),
            secs,
        }
    }
}
