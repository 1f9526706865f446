//! Permission mode parsing

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Highest meaningful permission pattern (setuid, setgid, sticky, rwx x3).
pub const MODE_MASK: u32 = 0o7777;

/// A mode as written in parameters: an octal string or raw permission bits.
///
/// Integers are taken as the bit pattern itself, so `420` and `"0644"`
/// are the same mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeSpec {
    Bits(u32),
    Octal(String),
}

impl ModeSpec {
    /// Canonical permission bits.
    pub fn to_bits(&self) -> Result<u32> {
        match self {
            Self::Bits(bits) if *bits <= MODE_MASK => Ok(*bits),
            Self::Bits(bits) => Err(Error::InvalidMode {
                value: format!("{:o}", bits),
            }),
            Self::Octal(text) => parse_octal(text),
        }
    }
}

/// Parse `"644"`, `"0644"` or `"0o644"` into permission bits.
pub fn parse_octal(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
    let invalid = || Error::InvalidMode {
        value: text.to_string(),
    };

    if digits.is_empty() || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return Err(invalid());
    }
    let bits = u32::from_str_radix(digits, 8).map_err(|_| invalid())?;
    if bits > MODE_MASK {
        return Err(invalid());
    }
    Ok(bits)
}
