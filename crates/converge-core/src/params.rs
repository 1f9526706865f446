//! Invocation parameters and their normalization into a request

use std::path::PathBuf;

use converge_fs::path::join_basename;
use converge_fs::{AttributeSet, FileArgs, expand_tilde};
use serde::{Deserialize, Serialize};

use crate::state::DesiredState;
use crate::{Error, Result};

/// Parameters as supplied by a caller (CLI flags or a parameter file).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParams {
    #[serde(alias = "dest", alias = "name")]
    pub path: Option<String>,
    pub state: DesiredState,
    /// Link source for `link`/`hard`; informational otherwise.
    pub src: Option<String>,
    pub recurse: bool,
    pub force: bool,
    /// Sniff the first bytes of `path` instead of reconciling.
    #[serde(alias = "diff_peek", alias = "dry_run")]
    pub peek: bool,
    #[serde(flatten)]
    pub args: FileArgs,
}

impl FileParams {
    /// The tilde-expanded target path.
    pub fn target(&self) -> Result<PathBuf> {
        self.path
            .as_deref()
            .map(expand_tilde)
            .ok_or(Error::MissingParameter { name: "path" })
    }

    /// The path actually reconciled.
    ///
    /// When `src` accompanies a file or directory state and the target is an
    /// existing directory, this is `target/<basename(src)>`.
    pub fn effective_target(&self) -> Result<PathBuf> {
        let path = self.target()?;
        if let Some(src) = self.src.as_deref().map(expand_tilde)
            && matches!(self.state, DesiredState::File | DesiredState::Directory)
            && path.is_dir()
            && let Some(inner) = join_basename(&path, &src)
        {
            tracing::debug!(from = %path.display(), to = %inner.display(), "destination is a directory");
            return Ok(inner);
        }
        Ok(path)
    }
}

/// A validated, normalized reconciliation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub path: PathBuf,
    pub state: DesiredState,
    pub src: Option<PathBuf>,
    pub attributes: AttributeSet,
    pub recurse: bool,
    pub force: bool,
}

impl Request {
    /// Validate and normalize parameters.
    ///
    /// All configuration errors surface here, before anything on disk is
    /// touched. The path is [`FileParams::effective_target`].
    pub fn from_params(params: &FileParams) -> Result<Self> {
        let path = params.effective_target()?;
        let src = params.src.as_deref().map(expand_tilde);

        if params.state.is_link() {
            let Some(src) = &src else {
                return Err(Error::MissingLinkSource { path });
            };
            if !src.is_absolute() {
                return Err(Error::RelativeSource {
                    path,
                    src: src.clone(),
                });
            }
        }

        Ok(Self {
            path,
            state: params.state,
            src,
            attributes: params.args.normalize()?,
            recurse: params.recurse,
            force: params.force,
        })
    }
}
