//! Workflow error types.

use std::path::PathBuf;

use thiserror::Error;

use super::platform::Platform;

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors that can occur while gating workflow steps.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Step identifier outside the fixed enumeration.
    #[error("Unknown step '{name}'. Valid steps: {}", crate::workflow::StepId::names().join(", "))]
    UnknownStep { name: String },

    /// Platform identifier outside the fixed enumeration.
    #[error("Unknown platform '{name}'. Valid platforms: {}", Platform::ids().join(", "))]
    UnknownPlatform { name: String },

    /// A different platform was already chosen for this project.
    #[error("Platform is already set to {current}; cannot change it to {requested}")]
    PlatformLocked { current: Platform, requested: Platform },

    /// Step catalog failed validation.
    #[error("Invalid step catalog: {0}")]
    InvalidCatalog(String),

    /// File could not be read or written.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML could not be written.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl WorkflowError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
