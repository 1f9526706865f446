//! Owner and group resolution against the system account database

use nix::unistd::{Group, User};

use crate::{Error, Result};

/// Resolve a user name or numeric id to a uid.
pub fn resolve_user(input: &str) -> Result<u32> {
    if let Ok(uid) = input.parse::<u32>() {
        return Ok(uid);
    }
    match User::from_name(input) {
        Ok(Some(user)) => Ok(user.uid.as_raw()),
        Ok(None) => Err(Error::UnknownUser {
            name: input.to_string(),
        }),
        Err(errno) => Err(Error::AccountLookup {
            name: input.to_string(),
            source: errno.into(),
        }),
    }
}

/// Resolve a group name or numeric id to a gid.
pub fn resolve_group(input: &str) -> Result<u32> {
    if let Ok(gid) = input.parse::<u32>() {
        return Ok(gid);
    }
    match Group::from_name(input) {
        Ok(Some(group)) => Ok(group.gid.as_raw()),
        Ok(None) => Err(Error::UnknownGroup {
            name: input.to_string(),
        }),
        Err(errno) => Err(Error::AccountLookup {
            name: input.to_string(),
            source: errno.into(),
        }),
    }
}
