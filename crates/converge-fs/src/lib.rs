//! Filesystem primitives for converge
//!
//! Provides the collaborators the reconciliation core consumes as black boxes:
//! attribute normalization, single-attribute primitives (ownership, mode,
//! security labels), platform capability detection, path helpers, parameter
//! file loading and the binary-content peek.

pub mod attrs;
pub mod capability;
pub mod config;
pub mod error;
pub mod identity;
pub mod io;
pub mod meta;
pub mod mode;
pub mod path;
pub mod peek;

pub use attrs::{AttributeSet, FileArgs, SecurityContext};
pub use capability::Capabilities;
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use meta::{AttributeOps, SystemAttributes};
pub use mode::ModeSpec;
pub use path::{expand_tilde, resolve_link_target};
pub use peek::appears_binary;
