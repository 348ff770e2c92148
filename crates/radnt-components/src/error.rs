//! Error types for radnt-components

use thiserror::Error;

/// Result type alias using radnt-components's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Component installation error types
#[derive(Error, Debug)]
pub enum Error {
    /// Project has not been set up for shadcn/ui
    #[error("No components.json found in {path}. Run \"radnt init\" first")]
    NotInitialized { path: String },

    /// Component is in the catalog but has no boilerplate yet
    #[error("Component {name} is not implemented yet")]
    NotImplemented { name: String },

    /// Embedded template missing or unreadable
    #[error("Template not found: {template}")]
    TemplateNotFound { template: String },

    /// Template error from Tera
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON parsing error
    #[error("Invalid components.json: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a not initialized error
    pub fn not_initialized(path: impl Into<String>) -> Self {
        Self::NotInitialized { path: path.into() }
    }

    /// Create a not implemented error
    pub fn not_implemented(name: impl Into<String>) -> Self {
        Self::NotImplemented { name: name.into() }
    }

    /// Create a template not found error
    pub fn template_not_found(template: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            template: template.into(),
        }
    }
}
