//! Byte-level capture of a directory tree.

use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// What one entry looked like at capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File { content: Vec<u8>, mode: u32, ino: u64 },
    Dir { mode: u32 },
    Symlink { target: PathBuf },
}

/// Every entry under a root, keyed by relative path.
///
/// Two snapshots compare equal only if no entry was added, removed,
/// retyped, rewritten, relinked or chmodded in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    nodes: BTreeMap<PathBuf, Node>,
}

impl TreeSnapshot {
    pub fn capture(root: &Path) -> Self {
        let mut nodes = BTreeMap::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.unwrap();
            let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
            let meta = fs::symlink_metadata(entry.path()).unwrap();
            let node = if meta.file_type().is_symlink() {
                Node::Symlink {
                    target: fs::read_link(entry.path()).unwrap(),
                }
            } else if meta.is_dir() {
                Node::Dir {
                    mode: meta.mode() & 0o7777,
                }
            } else {
                Node::File {
                    content: fs::read(entry.path()).unwrap(),
                    mode: meta.mode() & 0o7777,
                    ino: meta.ino(),
                }
            };
            nodes.insert(rel, node);
        }
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, rel: impl AsRef<Path>) -> Option<&Node> {
        self.nodes.get(rel.as_ref())
    }
}
