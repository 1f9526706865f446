//! Attribute convergence for a single filesystem object

use std::path::Path;

use converge_fs::{AttributeOps, AttributeSet, Capabilities, SecurityContext};

use crate::gate::{DryRunGate, Mutation, Step};

/// Applies each requested attribute only where it differs from disk.
///
/// Order is fixed: security label, owner, group, mode.
pub(crate) struct AttributeApplier<'a> {
    ops: &'a dyn AttributeOps,
    capabilities: Capabilities,
    gate: DryRunGate,
}

impl<'a> AttributeApplier<'a> {
    pub(crate) fn new(ops: &'a dyn AttributeOps, capabilities: Capabilities, gate: DryRunGate) -> Self {
        Self {
            ops,
            capabilities,
            gate,
        }
    }

    /// Converge `attrs` on `path`; true when anything was changed.
    pub(crate) fn apply(&self, path: &Path, attrs: &AttributeSet) -> Step<bool> {
        if attrs.is_empty() {
            return Ok(false);
        }
        let mut changed = false;

        if let Some(requested) = &attrs.security {
            changed |= self.apply_security_context(path, requested)?;
        }

        if let Some(owner) = attrs.owner {
            let (current, _) = self.ops.ownership(path)?;
            if current != owner {
                self.gate.admit(Mutation::SetOwner, path)?;
                self.ops.set_ownership(path, Some(owner), None)?;
                changed = true;
            }
        }

        if let Some(group) = attrs.group {
            let (_, current) = self.ops.ownership(path)?;
            if current != group {
                self.gate.admit(Mutation::SetGroup, path)?;
                self.ops.set_ownership(path, None, Some(group))?;
                changed = true;
            }
        }

        if let Some(mode) = attrs.mode {
            match self.ops.mode(path)? {
                Some(current) if current != mode => {
                    self.gate.admit(Mutation::SetMode, path)?;
                    self.ops.set_mode(path, mode)?;
                    changed = true;
                }
                Some(_) => {}
                None => {
                    tracing::debug!(path = %path.display(), "no settable mode, skipping chmod");
                }
            }
        }

        Ok(changed)
    }

    fn apply_security_context(&self, path: &Path, requested: &SecurityContext) -> Step<bool> {
        if !self.capabilities.security_labels {
            tracing::debug!(path = %path.display(), "security labels unsupported, skipping");
            return Ok(false);
        }

        let current = self.ops.security_context(path)?.unwrap_or_default();
        let desired = requested.merged_with(&current);
        if desired == current {
            return Ok(false);
        }

        self.gate.admit(Mutation::SetSecurityContext, path)?;
        self.ops.set_security_context(path, &desired)?;
        Ok(true)
    }
}
