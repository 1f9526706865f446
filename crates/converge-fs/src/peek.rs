//! Binary-content sniffing used by the peek diagnostic

use std::path::Path;

use crate::io;

/// Number of leading bytes inspected.
pub const PEEK_LEN: u64 = 8192;

/// Whether the first [`PEEK_LEN`] bytes of `path` contain a NUL byte.
///
/// Unreadable or missing paths are reported as not binary.
pub fn appears_binary(path: &Path) -> bool {
    match io::read_prefix(path, PEEK_LEN) {
        Ok(prefix) => prefix.contains(&0),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "peek could not read path");
            false
        }
    }
}
