//! [`TestTree`] builder for reconciliation scenarios.

use std::fs::{self, Permissions};
use std::os::unix::fs::{MetadataExt, PermissionsExt, symlink};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::snapshot::TreeSnapshot;

/// A temporary directory with helpers to lay out files, directories and
/// links, and to assert on what ends up there.
///
/// # Example
///
/// ```rust,no_run
/// use converge_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.file("etc/app.conf", "key = 1\n");
/// tree.symlink("current", "/etc/hosts");
/// tree.assert_symlink("current", "/etc/hosts");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root path of the sandbox.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the sandbox.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Same as [`TestTree::path`], as a `String` for parameter structs.
    pub fn path_str(&self, rel: &str) -> String {
        self.path(rel).to_string_lossy().into_owned()
    }

    /// Write a file, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Create a symlink at `rel` whose recorded target is `target` verbatim.
    pub fn symlink(&self, rel: &str, target: impl AsRef<Path>) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        symlink(target, &path).unwrap();
        path
    }

    pub fn chmod(&self, rel: &str, mode: u32) {
        fs::set_permissions(self.path(rel), Permissions::from_mode(mode)).unwrap();
    }

    /// Permission bits of `rel` (follows symlinks).
    pub fn mode(&self, rel: &str) -> u32 {
        fs::metadata(self.path(rel)).unwrap().mode() & 0o7777
    }

    pub fn inode(&self, rel: &str) -> u64 {
        fs::metadata(self.path(rel)).unwrap().ino()
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::capture(self.root())
    }

    pub fn assert_absent(&self, rel: &str) {
        assert!(
            fs::symlink_metadata(self.path(rel)).is_err(),
            "expected {} to be absent",
            rel
        );
    }

    pub fn assert_file(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        let meta = fs::symlink_metadata(&path).unwrap_or_else(|_| panic!("{} does not exist", rel));
        assert!(meta.file_type().is_file(), "expected {} to be a plain file", rel);
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    pub fn assert_dir(&self, rel: &str) {
        let meta = fs::symlink_metadata(self.path(rel))
            .unwrap_or_else(|_| panic!("{} does not exist", rel));
        assert!(meta.file_type().is_dir(), "expected {} to be a directory", rel);
    }

    pub fn assert_symlink(&self, rel: &str, target: impl AsRef<Path>) {
        let recorded = fs::read_link(self.path(rel))
            .unwrap_or_else(|_| panic!("expected {} to be a symlink", rel));
        assert_eq!(recorded, target.as_ref());
    }
}
