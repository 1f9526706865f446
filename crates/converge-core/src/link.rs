//! Symbolic and hard link creation

use std::fs;
use std::path::Path;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Symbolic,
    Hard,
}

/// Create a link at `path` pointing to `src`.
///
/// Failures carry the OS error along with both paths.
pub fn create_link(src: &Path, path: &Path, kind: LinkKind) -> Result<()> {
    let result = match kind {
        LinkKind::Symbolic => std::os::unix::fs::symlink(src, path),
        LinkKind::Hard => fs::hard_link(src, path),
    };
    result.map_err(|source| Error::Link {
        path: path.to_path_buf(),
        src: src.to_path_buf(),
        source,
    })
}
