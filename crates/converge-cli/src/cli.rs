//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use converge_core::{DesiredState, FileParams};
use converge_fs::{ConfigStore, ModeSpec};

use crate::error::Result;

/// converge - Bring a path to a declared state (file, directory, link, hard, absent)
///
/// Prints a JSON result on stdout. Exits 1 on failure.
///
/// Examples:
///   converge /srv/www --state directory --mode 0755 --recurse
///   converge /etc/app/current --state link --src /etc/app/releases/v2
///   converge --params site.toml --check
#[derive(Parser, Debug)]
#[command(name = "converge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to reconcile
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Path to reconcile, as a flag
    #[arg(long, visible_alias = "name", conflicts_with = "path", value_name = "PATH")]
    pub dest: Option<String>,

    /// Desired state: file, directory, link, hard or absent
    #[arg(short, long, value_parser = parse_state)]
    pub state: Option<DesiredState>,

    /// Link source; must be absolute for link and hard
    #[arg(long)]
    pub src: Option<String>,

    /// Owner, as a user name or numeric uid
    #[arg(long)]
    pub owner: Option<String>,

    /// Group, as a group name or numeric gid
    #[arg(long)]
    pub group: Option<String>,

    /// Permission bits in octal, e.g. 0644
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Security label user component
    #[arg(long)]
    pub seuser: Option<String>,

    /// Security label role component
    #[arg(long)]
    pub serole: Option<String>,

    /// Security label type component
    #[arg(long)]
    pub setype: Option<String>,

    /// Security label level component
    #[arg(long)]
    pub selevel: Option<String>,

    /// Apply attributes to every descendant of a directory
    #[arg(short, long)]
    pub recurse: bool,

    /// Replace a file with a link, or link to a missing source
    #[arg(short, long)]
    pub force: bool,

    /// Only report whether PATH looks binary
    #[arg(long, visible_alias = "diff-peek")]
    pub peek: bool,

    /// Predict changes without performing them
    #[arg(long, env = "CONVERGE_CHECK")]
    pub check: bool,

    /// Load parameters from a TOML, JSON or YAML file; flags take precedence
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_state(value: &str) -> std::result::Result<DesiredState, String> {
    value.parse().map_err(|e: converge_core::Error| e.to_string())
}

impl Cli {
    /// Merge the parameter file (if any) with explicit flags.
    ///
    /// Switches only turn options on; a `true` in the file cannot be
    /// cleared from the command line.
    pub fn to_params(&self) -> Result<FileParams> {
        let mut params: FileParams = match &self.params {
            Some(file) => {
                tracing::debug!(file = %file.display(), "loading parameters");
                ConfigStore::new().load(file)?
            }
            None => FileParams::default(),
        };

        if let Some(path) = self.path.as_ref().or(self.dest.as_ref()) {
            params.path = Some(path.clone());
        }
        if let Some(state) = self.state {
            params.state = state;
        }
        if let Some(src) = &self.src {
            params.src = Some(src.clone());
        }
        if let Some(mode) = &self.mode {
            params.args.mode = Some(ModeSpec::Octal(mode.clone()));
        }

        let args = &mut params.args;
        for (flag, slot) in [
            (&self.owner, &mut args.owner),
            (&self.group, &mut args.group),
            (&self.seuser, &mut args.seuser),
            (&self.serole, &mut args.serole),
            (&self.setype, &mut args.setype),
            (&self.selevel, &mut args.selevel),
        ] {
            if let Some(value) = flag {
                *slot = Some(value.clone());
            }
        }

        params.recurse |= self.recurse;
        params.force |= self.force;
        params.peek |= self.peek;

        Ok(params)
    }
}
