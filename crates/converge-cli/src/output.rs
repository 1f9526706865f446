//! JSON payloads written to stdout

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{CliError, Result};

/// Payload for a fatal error.
#[derive(Debug, Serialize)]
pub struct Failure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub msg: String,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<PathBuf>,
}

impl Failure {
    /// Describe `err`, falling back to `target` when the error carries no path.
    pub fn new(err: &CliError, target: Option<PathBuf>) -> Self {
        Self {
            path: err.path().map(PathBuf::from).or(target),
            msg: err.to_string(),
            failed: true,
            src: err.src().map(PathBuf::from),
        }
    }
}

pub fn emit<T: Serialize>(payload: &T) -> Result<()> {
    let json = serde_json::to_string(payload)?;
    println!("{}", json);
    Ok(())
}
