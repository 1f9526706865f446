//! Result of one reconciliation pass

use std::path::PathBuf;

use serde::Serialize;

/// What a reconciliation did (or, in check mode, would do).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub path: PathBuf,
    /// OR'd across every sub-operation; never reset once set.
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<PathBuf>,
    /// Soft-failure text, e.g. a partially failed tree removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appears_binary: Option<bool>,
}

impl Outcome {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            changed: false,
            src: None,
            msg: None,
            appears_binary: None,
        }
    }

    /// Result of the peek diagnostic; never a change.
    pub fn peek(path: impl Into<PathBuf>, appears_binary: bool) -> Self {
        Self {
            appears_binary: Some(appears_binary),
            ..Self::new(path)
        }
    }

    pub fn record(&mut self, changed: bool) {
        self.changed |= changed;
    }
}
