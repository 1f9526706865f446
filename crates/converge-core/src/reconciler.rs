//! The reconciliation state machine
//!
//! Classifies the current object, picks the transition for the desired
//! state, performs the structural change (remove, mkdir, link) and then
//! converges attributes. Every mutation goes through the [`DryRunGate`].

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use converge_fs::{AttributeOps, Capabilities, SystemAttributes, appears_binary, resolve_link_target};
use walkdir::WalkDir;

use crate::attributes::AttributeApplier;
use crate::context::Invocation;
use crate::gate::{DryRunGate, Halt, Mutation, Step};
use crate::inspect::{FilesystemObjectState, classify};
use crate::link::{LinkKind, create_link};
use crate::outcome::Outcome;
use crate::params::{FileParams, Request};
use crate::state::DesiredState;
use crate::{Error, Result};

static SYSTEM_ATTRIBUTES: SystemAttributes = SystemAttributes;

/// The transition chosen for a (current, desired) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Nothing there and nothing wanted.
    Noop,
    Remove,
    /// A file was requested where nothing exists.
    MissingContent,
    ConvergeFile,
    EnsureDirectory,
    EnsureLink(LinkKind),
    /// The object is of a different type than requested.
    Refuse,
}

/// Pick the transition from `current` to `desired`.
///
/// A file may become a link only through the link logic, which demands
/// `force` for a symlink and an identical inode for a hard link.
pub fn plan(current: FilesystemObjectState, desired: DesiredState) -> Plan {
    use FilesystemObjectState as Current;

    match (current, desired) {
        (Current::Absent, DesiredState::Absent) => Plan::Noop,
        (_, DesiredState::Absent) => Plan::Remove,
        (Current::Absent, DesiredState::File) => Plan::MissingContent,
        (Current::File, DesiredState::File) => Plan::ConvergeFile,
        (Current::Absent | Current::Directory, DesiredState::Directory) => Plan::EnsureDirectory,
        (Current::Absent | Current::Symlink | Current::File, DesiredState::Link) => {
            Plan::EnsureLink(LinkKind::Symbolic)
        }
        (Current::Absent | Current::File, DesiredState::Hard) => Plan::EnsureLink(LinkKind::Hard),
        _ => Plan::Refuse,
    }
}

/// Options that apply to an invocation as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvocationOptions {
    /// Predict changes without performing them.
    pub check_mode: bool,
    pub capabilities: Capabilities,
}

impl InvocationOptions {
    /// Options for the running system, probing its capabilities once.
    pub fn detect(check_mode: bool) -> Self {
        Self {
            check_mode,
            capabilities: Capabilities::detect(),
        }
    }
}

/// Drives one reconciliation per call; holds no state between calls.
pub struct Reconciler<'a> {
    ops: &'a dyn AttributeOps,
    options: InvocationOptions,
}

impl Reconciler<'static> {
    /// A reconciler applying attributes to the real filesystem.
    pub fn system(options: InvocationOptions) -> Self {
        Self::new(&SYSTEM_ATTRIBUTES, options)
    }
}

impl<'a> Reconciler<'a> {
    pub fn new(ops: &'a dyn AttributeOps, options: InvocationOptions) -> Self {
        Self { ops, options }
    }

    /// Handle raw parameters: either the peek diagnostic or a full
    /// reconciliation.
    pub fn run(&self, params: &FileParams) -> Result<Outcome> {
        if params.peek {
            let path = params.target()?;
            let binary = appears_binary(&path);
            return Ok(Outcome::peek(path, binary));
        }
        let request = Request::from_params(params)?;
        self.reconcile(&request)
    }

    /// Converge the filesystem to `request`.
    pub fn reconcile(&self, request: &Request) -> Result<Outcome> {
        let gate = DryRunGate::new(self.options.check_mode);
        let applier = AttributeApplier::new(self.ops, self.options.capabilities, gate);
        let mut ctx = Invocation::new(request, gate, applier);

        match transition(&mut ctx) {
            Ok(()) => Ok(ctx.finish()),
            Err(Halt::Predicted(mutation)) => {
                tracing::debug!(%mutation, "stopping at first predicted change");
                ctx.outcome.record(true);
                Ok(ctx.finish())
            }
            Err(Halt::Failed(e)) => Err(e),
        }
    }
}

fn transition(ctx: &mut Invocation<'_>) -> Step<()> {
    let request = ctx.request;
    let path = request.path.as_path();
    let current = classify(path);
    let desired = request.state;
    let plan = plan(current, desired);
    tracing::debug!(path = %path.display(), %current, %desired, ?plan, "classified");

    match plan {
        Plan::Noop => Ok(()),
        Plan::Remove => remove(ctx, current),
        Plan::MissingContent => Err(Error::MissingContent {
            path: path.to_path_buf(),
        }
        .into()),
        Plan::ConvergeFile => ctx.converge_attributes(path),
        Plan::EnsureDirectory => ensure_directory(ctx, current),
        Plan::EnsureLink(kind) => ensure_link(ctx, current, kind),
        Plan::Refuse => Err(Error::IllegalTransition {
            path: path.to_path_buf(),
            from: current,
            to: desired,
        }
        .into()),
    }
}

fn remove(ctx: &mut Invocation<'_>, current: FilesystemObjectState) -> Step<()> {
    let request = ctx.request;
    let path = request.path.as_path();

    if current == FilesystemObjectState::Directory {
        ctx.gate.admit(Mutation::RemoveTree, path)?;
        if let Err(e) = fs::remove_dir_all(path) {
            tracing::warn!(path = %path.display(), error = %e, "tree removal failed part way");
            ctx.outcome.msg = Some(format!("rmtree failed: {}", e));
        }
    } else {
        ctx.gate.admit(Mutation::Unlink, path)?;
        fs::remove_file(path).map_err(|e| Error::os(Mutation::Unlink.as_str(), path, e))?;
    }

    ctx.outcome.record(true);
    Ok(())
}

fn ensure_directory(ctx: &mut Invocation<'_>, current: FilesystemObjectState) -> Step<()> {
    let request = ctx.request;
    let path = request.path.as_path();

    if current == FilesystemObjectState::Absent {
        ctx.gate.admit(Mutation::CreateDirectory, path)?;
        fs::create_dir_all(path)
            .map_err(|e| Error::os(Mutation::CreateDirectory.as_str(), path, e))?;
        ctx.outcome.record(true);
    }

    ctx.converge_attributes(path)?;

    if request.recurse {
        for entry in WalkDir::new(path).min_depth(1).follow_links(false) {
            let entry = entry.map_err(|e| {
                let at = e.path().unwrap_or(path).to_path_buf();
                Error::os("walk directory", at, e.into())
            })?;
            if entry.path_is_symlink() {
                ctx.converge_link_attributes(entry.path())?;
            } else {
                ctx.converge_attributes(entry.path())?;
            }
        }
    }

    Ok(())
}

fn ensure_link(ctx: &mut Invocation<'_>, current: FilesystemObjectState, kind: LinkKind) -> Step<()> {
    let request = ctx.request;
    let path = request.path.as_path();
    let Some(src) = request.src.as_deref() else {
        return Err(Error::MissingLinkSource {
            path: path.to_path_buf(),
        }
        .into());
    };
    ctx.outcome.src = Some(src.to_path_buf());

    if !request.force && !src.exists() {
        return Err(Error::SourceMissing {
            path: path.to_path_buf(),
            src: src.to_path_buf(),
        }
        .into());
    }

    match (current, kind) {
        (FilesystemObjectState::Absent, _) => {
            ctx.gate.admit(Mutation::CreateLink, path)?;
            create_link(src, path, kind)?;
            ctx.outcome.record(true);
        }
        (FilesystemObjectState::Symlink, LinkKind::Symbolic) => {
            let recorded = fs::read_link(path).map_err(|e| Error::os("read link", path, e))?;
            let resolved = resolve_link_target(path, &recorded);
            if resolved != src {
                ctx.gate.admit(Mutation::RepointLink, path)?;
                replace_with_link(src, path, kind)?;
                ctx.outcome.record(true);
            } else {
                tracing::debug!(path = %path.display(), "link already points to src");
            }
        }
        (FilesystemObjectState::File, LinkKind::Symbolic) => {
            if !request.force {
                return Err(Error::DestinationOccupied {
                    path: path.to_path_buf(),
                    src: src.to_path_buf(),
                }
                .into());
            }
            ctx.gate.admit(Mutation::ReplaceWithLink, path)?;
            replace_with_link(src, path, kind)?;
            ctx.outcome.record(true);
        }
        (FilesystemObjectState::File, LinkKind::Hard) if same_inode(path, src) => {
            tracing::debug!(path = %path.display(), "hard link already in place");
        }
        _ => {
            return Err(Error::IllegalTransition {
                path: path.to_path_buf(),
                from: current,
                to: request.state,
            }
            .into());
        }
    }

    ctx.converge_attributes(path)
}

fn replace_with_link(src: &Path, path: &Path, kind: LinkKind) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::os(Mutation::Unlink.as_str(), path, e))?;
    create_link(src, path, kind)
}

fn same_inode(a: &Path, b: &Path) -> bool {
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}
