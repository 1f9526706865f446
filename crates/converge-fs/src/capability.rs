//! Platform capability detection, performed once per invocation

use std::path::Path;

/// Marker present when selinuxfs is mounted and a policy is loaded.
const SELINUX_ENFORCE: &str = "/sys/fs/selinux/enforce";

/// Optional platform features the attribute applier consults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Mandatory-access-control labels can be read and written.
    pub security_labels: bool,
}

impl Capabilities {
    /// Probe the running system.
    pub fn detect() -> Self {
        let caps = Self {
            security_labels: cfg!(target_os = "linux") && Path::new(SELINUX_ENFORCE).exists(),
        };
        tracing::debug!(security_labels = caps.security_labels, "detected platform capabilities");
        caps
    }

    /// No optional features; labels are always skipped.
    pub fn none() -> Self {
        Self::default()
    }
}
