//! Filesystem state reconciliation for converge
//!
//! Given a path and a desired state (file, directory, symlink, hard link or
//! absent), classifies what is on disk, decides whether the transition is
//! legal and applies the minimal set of operations to converge, reporting
//! whether anything changed.
//!
//! # Architecture
//!
//! ```text
//!                converge-cli
//!                     |
//!               converge-core
//!   inspect -> reconciler -> attributes / link
//!                   |  (gate consulted before every mutation)
//!                converge-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use converge_core::{DesiredState, FileParams, InvocationOptions, Reconciler};
//!
//! let params = FileParams {
//!     path: Some("/tmp/cache".into()),
//!     state: DesiredState::Directory,
//!     ..Default::default()
//! };
//! let outcome = Reconciler::system(InvocationOptions::detect(false)).run(&params)?;
//! println!("changed: {}", outcome.changed);
//! # Ok::<(), converge_core::Error>(())
//! ```

mod attributes;
mod context;
pub mod error;
mod gate;
pub mod inspect;
pub mod link;
pub mod outcome;
pub mod params;
pub mod reconciler;
pub mod state;

pub use error::{Error, ErrorKind, Result};
pub use gate::{DryRunGate, Mutation};
pub use inspect::{FilesystemObjectState, classify};
pub use link::{LinkKind, create_link};
pub use outcome::Outcome;
pub use params::{FileParams, Request};
pub use reconciler::{InvocationOptions, Plan, Reconciler, plan};
pub use state::DesiredState;

/// Reconcile `params` against the running system.
pub fn converge(params: &FileParams, check_mode: bool) -> Result<Outcome> {
    Reconciler::system(InvocationOptions::detect(check_mode)).run(params)
}
