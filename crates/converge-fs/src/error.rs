//! Error types for converge-fs

use std::path::PathBuf;

/// Result type for converge-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in converge-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} parameters at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported parameter file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("chown failed: failed to look up user {name}")]
    UnknownUser { name: String },

    #[error("chgrp failed: failed to look up group {name}")]
    UnknownGroup { name: String },

    #[error("Failed to query the account database for {name}: {source}")]
    AccountLookup {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid mode: {value}")]
    InvalidMode { value: String },

    #[error("Invalid security context: {value}")]
    InvalidSecurityContext { value: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The filesystem path this error refers to, when it has one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. } | Self::ConfigParse { path, .. } => Some(path),
            _ => None,
        }
    }
}
