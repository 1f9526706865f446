//! Shared test utilities for the converge workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for sandboxed filesystem scenarios
//! - [`snapshot`]: [`TreeSnapshot`] byte-level capture for "nothing changed" assertions

pub mod snapshot;
pub mod tree;

pub use snapshot::TreeSnapshot;
pub use tree::TestTree;
