//! Path helpers shared by the reconciler and the CLI

use std::path::{Path, PathBuf};

/// Expand a leading `~` or `~/` to the current user's home directory.
///
/// `~user` forms and paths without a leading tilde are returned unchanged,
/// as is everything when no home directory can be determined.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Resolve the target recorded in an existing symlink for comparison.
///
/// Relative targets are interpreted against the directory containing the
/// link itself, which is how the kernel resolves them.
pub fn resolve_link_target(link: &Path, recorded: &Path) -> PathBuf {
    if recorded.is_absolute() {
        return recorded.to_path_buf();
    }
    match link.parent() {
        Some(parent) => parent.join(recorded),
        None => recorded.to_path_buf(),
    }
}

/// `dir/<basename of src>`, or `None` when `src` has no final component.
pub fn join_basename(dir: &Path, src: &Path) -> Option<PathBuf> {
    src.file_name().map(|name| dir.join(name))
}
