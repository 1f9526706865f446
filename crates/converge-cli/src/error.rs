//! Error types for converge-cli

use std::path::Path;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from converge-core
    #[error(transparent)]
    Core(#[from] converge_core::Error),

    /// Error from converge-fs, e.g. an unreadable parameter file
    #[error(transparent)]
    Fs(#[from] converge_fs::Error),

    #[error("failed to encode result: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// The path the failure concerns, when known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Core(e) => e.path(),
            Self::Fs(e) => e.path(),
            Self::Json(_) => None,
        }
    }

    /// The link source involved, for link failures.
    pub fn src(&self) -> Option<&Path> {
        match self {
            Self::Core(e) => e.src(),
            _ => None,
        }
    }
}
