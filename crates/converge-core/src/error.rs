//! Error types for converge-core

use std::path::{Path, PathBuf};

use crate::inspect::FilesystemObjectState;
use crate::state::DesiredState;

/// Result type for converge-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of a failure, used by callers to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing parameters; nothing was touched.
    Configuration,
    /// The requested change would destroy an object of a different type.
    IllegalTransition,
    /// `state=file` on a path that does not exist.
    MissingContent,
    /// The operating system rejected an operation.
    Os,
}

/// Errors that can occur while reconciling a path
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{name} is required")]
    MissingParameter { name: &'static str },

    #[error("src and dest are required for creating links")]
    MissingLinkSource { path: PathBuf },

    #[error("absolute paths are required, got src {src}")]
    RelativeSource { path: PathBuf, src: PathBuf },

    #[error("value of state must be one of: file, directory, link, hard, absent, got: {value}")]
    InvalidState { value: String },

    #[error("refusing to convert between {from} and {to} for {path}")]
    IllegalTransition {
        path: PathBuf,
        from: FilesystemObjectState,
        to: DesiredState,
    },

    #[error("cannot link, file exists at destination {path}")]
    DestinationOccupied { path: PathBuf, src: PathBuf },

    #[error("file ({path}) does not exist, use the copy or template tools to create it")]
    MissingContent { path: PathBuf },

    #[error("src file does not exist: {src}")]
    SourceMissing { path: PathBuf, src: PathBuf },

    #[error("error while linking {path} to {src}: {source}")]
    Link {
        path: PathBuf,
        src: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{action} failed for {path}: {source}")]
    Os {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from converge-fs primitives and normalization
    #[error(transparent)]
    Fs(#[from] converge_fs::Error),
}

impl Error {
    pub fn os(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Os {
            action,
            path: path.into(),
            source,
        }
    }

    /// The category this error reports as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParameter { .. }
            | Self::MissingLinkSource { .. }
            | Self::RelativeSource { .. }
            | Self::InvalidState { .. } => ErrorKind::Configuration,
            Self::IllegalTransition { .. }
            | Self::DestinationOccupied { .. }
            | Self::SourceMissing { .. } => ErrorKind::IllegalTransition,
            Self::MissingContent { .. } => ErrorKind::MissingContent,
            Self::Link { .. } | Self::Os { .. } => ErrorKind::Os,
            Self::Fs(converge_fs::Error::Io { .. }) => ErrorKind::Os,
            Self::Fs(_) => ErrorKind::Configuration,
        }
    }

    /// The path the failure concerns, when known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MissingLinkSource { path }
            | Self::RelativeSource { path, .. }
            | Self::IllegalTransition { path, .. }
            | Self::DestinationOccupied { path, .. }
            | Self::MissingContent { path }
            | Self::SourceMissing { path, .. }
            | Self::Link { path, .. }
            | Self::Os { path, .. } => Some(path),
            Self::Fs(e) => e.path(),
            Self::MissingParameter { .. } | Self::InvalidState { .. } => None,
        }
    }

    /// The link source involved, for link failures.
    pub fn src(&self) -> Option<&Path> {
        match self {
            Self::RelativeSource { src, .. }
            | Self::DestinationOccupied { src, .. }
            | Self::SourceMissing { src, .. }
            | Self::Link { src, .. } => Some(src),
            _ => None,
        }
    }
}
