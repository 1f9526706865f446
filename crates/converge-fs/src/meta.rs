//! Single-attribute primitives: read and apply ownership, mode and labels
//!
//! The reconciler never calls chmod/chown/setxattr directly; it goes through
//! [`AttributeOps`] so the decision logic can be exercised against fakes.

use std::fs::{self, Permissions};
use std::io;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

use crate::attrs::SecurityContext;
use crate::mode::MODE_MASK;
use crate::{Error, Result};

/// Read/apply access to the attributes of one filesystem object.
pub trait AttributeOps {
    /// Current `(uid, gid)` of the object itself (symlinks are not followed).
    fn ownership(&self, path: &Path) -> Result<(u32, u32)>;

    /// Change owner and/or group of the object itself.
    fn set_ownership(&self, path: &Path, owner: Option<u32>, group: Option<u32>) -> Result<()>;

    /// Current permission bits, or `None` when the object has no settable
    /// mode (a dangling symlink).
    fn mode(&self, path: &Path) -> Result<Option<u32>>;

    fn set_mode(&self, path: &Path, mode: u32) -> Result<()>;

    /// Current security label, or `None` when the object carries none.
    fn security_context(&self, path: &Path) -> Result<Option<SecurityContext>> {
        if !xattr::SUPPORTED_PLATFORM {
            return Ok(None);
        }
        let raw = match xattr::get(path, SELINUX_XATTR) {
            Ok(raw) => raw,
            Err(e) if label_unsupported(&e) => None,
            Err(e) => return Err(Error::io(path, e)),
        };
        let Some(raw) = raw else {
            return Ok(None);
        };
        let label = String::from_utf8_lossy(&raw);
        SecurityContext::parse(&label).map(Some)
    }

    fn set_security_context(&self, path: &Path, context: &SecurityContext) -> Result<()> {
        // Labels are stored NUL-terminated.
        let mut value = context.to_string().into_bytes();
        value.push(0);
        xattr::set(path, SELINUX_XATTR, &value).map_err(|e| Error::io(path, e))
    }
}

/// Extended attribute holding the SELinux label.
const SELINUX_XATTR: &str = "security.selinux";

/// The filesystem cannot carry labels at all.
fn label_unsupported(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Unsupported
        || err.raw_os_error() == Some(nix::errno::Errno::EOPNOTSUPP as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    #[test]
    fn mode_reads_permission_bits() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("script.sh");
        fs::write(&file, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&file, Permissions::from_mode(0o750)).unwrap();

        assert_eq!(SystemAttributes.mode(&file).unwrap(), Some(0o750));
    }

    #[test]
    fn set_mode_changes_bits() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config");
        fs::write(&file, "x").unwrap();

        SystemAttributes.set_mode(&file, 0o600).unwrap();
        assert_eq!(SystemAttributes.mode(&file).unwrap(), Some(0o600));
    }

    #[test]
    fn dangling_symlink_has_no_mode() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("dangling");
        symlink(dir.path().join("nowhere"), &link).unwrap();

        assert_eq!(SystemAttributes.mode(&link).unwrap(), None);
    }

    #[test]
    fn ownership_of_dangling_symlink_is_readable() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("dangling");
        symlink(dir.path().join("nowhere"), &link).unwrap();

        let (uid, _) = SystemAttributes.ownership(&link).unwrap();
        assert_eq!(uid, nix::unistd::geteuid().as_raw());
    }

    #[test]
    fn unlabelled_dangling_symlink_reads_without_following() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("dangling");
        symlink(dir.path().join("nowhere"), &link).unwrap();

        // A followed lookup would fail with NotFound
        assert!(SystemAttributes.security_context(&link).is_ok());
    }

    #[test]
    fn chown_to_current_owner_succeeds() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("mine");
        fs::write(&file, "x").unwrap();
        let (uid, gid) = SystemAttributes.ownership(&file).unwrap();

        SystemAttributes
            .set_ownership(&file, Some(uid), Some(gid))
            .unwrap();
        assert_eq!(SystemAttributes.ownership(&file).unwrap(), (uid, gid));
    }
}
