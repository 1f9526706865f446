//! Desired attribute sets and their normalization from textual arguments

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mode::ModeSpec;
use crate::{Error, Result, identity};

/// A mandatory-access-control label split into its four components.
///
/// Components left as `None` are "don't care": they are filled from the
/// object's current label before comparing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    pub user: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub level: Option<String>,
}

impl SecurityContext {
    /// Parse a label of the form `user:role:type[:level]`.
    ///
    /// The level may itself contain colons (`s0:c0,c1` or `s0-s0:c0.c1023`).
    pub fn parse(label: &str) -> Result<Self> {
        let label = label.trim_end_matches('\0');
        let mut parts = label.splitn(4, ':');
        let mut next = || {
            parts
                .next()
                .filter(|part| !part.is_empty())
                .map(str::to_string)
        };
        let (user, role, kind, level) = (next(), next(), next(), next());
        if user.is_none() || role.is_none() || kind.is_none() {
            return Err(Error::InvalidSecurityContext {
                value: label.to_string(),
            });
        }
        Ok(Self {
            user,
            role,
            kind,
            level,
        })
    }

    /// True when no component is requested.
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.role.is_none() && self.kind.is_none() && self.level.is_none()
    }

    /// Fill unspecified components from `current`.
    pub fn merged_with(&self, current: &SecurityContext) -> SecurityContext {
        SecurityContext {
            user: self.user.clone().or_else(|| current.user.clone()),
            role: self.role.clone().or_else(|| current.role.clone()),
            kind: self.kind.clone().or_else(|| current.kind.clone()),
            level: self.level.clone().or_else(|| current.level.clone()),
        }
    }
}

impl fmt::Display for SecurityContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [&self.user, &self.role, &self.kind, &self.level];
        let rendered: Vec<&str> = parts
            .iter()
            .filter_map(|part| part.as_deref())
            .collect();
        write!(f, "{}", rendered.join(":"))
    }
}

/// Canonical desired attributes. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    pub owner: Option<u32>,
    pub group: Option<u32>,
    pub mode: Option<u32>,
    pub security: Option<SecurityContext>,
}

impl AttributeSet {
    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.group.is_none() && self.mode.is_none() && self.security.is_none()
    }
}

/// The common file arguments as supplied by a caller, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileArgs {
    pub owner: Option<String>,
    pub group: Option<String>,
    pub mode: Option<ModeSpec>,
    pub seuser: Option<String>,
    pub serole: Option<String>,
    pub setype: Option<String>,
    pub selevel: Option<String>,
}

impl FileArgs {
    /// Normalize textual arguments into an [`AttributeSet`].
    ///
    /// Owners and groups may be names or numeric ids; modes are octal
    /// strings or raw bits.
    pub fn normalize(&self) -> Result<AttributeSet> {
        let owner = self.owner.as_deref().map(identity::resolve_user).transpose()?;
        let group = self.group.as_deref().map(identity::resolve_group).transpose()?;
        let mode = self.mode.as_ref().map(ModeSpec::to_bits).transpose()?;

        let security = SecurityContext {
            user: self.seuser.clone(),
            role: self.serole.clone(),
            kind: self.setype.clone(),
            level: self.selevel.clone(),
        };

        Ok(AttributeSet {
            owner,
            group,
            mode,
            security: (!security.is_empty()).then_some(security),
        })
    }
}
