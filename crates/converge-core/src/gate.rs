//! Dry-run gate consulted before every mutation
//!
//! In check mode the first gate reached halts the invocation with a
//! predicted change; nothing after it runs. In normal mode the gate only
//! logs the mutation about to happen.

use std::fmt;
use std::path::Path;

use crate::Error;

/// A filesystem mutation the reconciler is about to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Unlink,
    RemoveTree,
    CreateDirectory,
    CreateLink,
    /// Replace a plain file with a link.
    ReplaceWithLink,
    /// Unlink an existing symlink and relink it to a new source.
    RepointLink,
    SetSecurityContext,
    SetOwner,
    SetGroup,
    SetMode,
}

impl Mutation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unlink => "unlink",
            Self::RemoveTree => "remove tree",
            Self::CreateDirectory => "create directory",
            Self::CreateLink => "create link",
            Self::ReplaceWithLink => "replace file with link",
            Self::RepointLink => "repoint link",
            Self::SetSecurityContext => "set security context",
            Self::SetOwner => "chown",
            Self::SetGroup => "chgrp",
            Self::SetMode => "chmod",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an invocation stopped before running to completion.
#[derive(Debug)]
pub(crate) enum Halt {
    /// Check mode reached a gate; the change is predicted, not performed.
    Predicted(Mutation),
    Failed(Error),
}

impl From<Error> for Halt {
    fn from(e: Error) -> Self {
        Self::Failed(e)
    }
}

impl From<converge_fs::Error> for Halt {
    fn from(e: converge_fs::Error) -> Self {
        Self::Failed(e.into())
    }
}

pub(crate) type Step<T> = std::result::Result<T, Halt>;

/// Gate placed in front of every mutating action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DryRunGate {
    check_mode: bool,
}

impl DryRunGate {
    pub fn new(check_mode: bool) -> Self {
        Self { check_mode }
    }

    /// Whether reaching a gate ends the invocation with a predicted change.
    pub fn would_change(&self) -> bool {
        self.check_mode
    }

    /// Let `mutation` on `path` proceed, or halt with a prediction.
    pub(crate) fn admit(&self, mutation: Mutation, path: &Path) -> Step<()> {
        if self.check_mode {
            tracing::debug!(path = %path.display(), %mutation, "check mode: change predicted");
            return Err(Halt::Predicted(mutation));
        }
        tracing::info!(path = %path.display(), %mutation, "applying");
        Ok(())
    }
}
