//! Desired filesystem object state

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The state a caller wants the path to end up in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// An existing plain file; content is never created.
    #[default]
    File,
    Directory,
    /// A symbolic link to `src`.
    Link,
    /// A hard link to `src`.
    Hard,
    Absent,
}

impl DesiredState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Link => "link",
            Self::Hard => "hard",
            Self::Absent => "absent",
        }
    }

    /// Whether this state requires a link source.
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link | Self::Hard)
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesiredState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "directory" => Ok(Self::Directory),
            "link" => Ok(Self::Link),
            "hard" => Ok(Self::Hard),
            "absent" => Ok(Self::Absent),
            _ => Err(Error::InvalidState {
                value: s.to_string(),
            }),
        }
    }
}
