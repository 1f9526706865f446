//! Classification of what currently occupies a path

use std::fmt;
use std::fs;
use std::path::Path;

/// What is on disk at a path, as seen without following a final symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilesystemObjectState {
    Absent,
    /// Anything that exists and is neither a directory nor a symlink.
    File,
    Directory,
    /// A symlink, whether or not its target exists.
    Symlink,
}

impl FilesystemObjectState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "link",
        }
    }
}

impl fmt::Display for FilesystemObjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `path` using link-aware metadata. Never fails.
pub fn classify(path: &Path) -> FilesystemObjectState {
    match fs::symlink_metadata(path) {
        Err(_) => FilesystemObjectState::Absent,
        Ok(meta) => {
            let file_type = meta.file_type();
            if file_type.is_symlink() {
                FilesystemObjectState::Symlink
            } else if file_type.is_dir() {
                FilesystemObjectState::Directory
            } else {
                FilesystemObjectState::File
            }
        }
    }
}
