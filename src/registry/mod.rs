//! Entity registry core: id assignment, creation-order storage, lookup.
//!
//! Specializations (employees, notifications, ...) implement [`EntityKind`]
//! and park a single `Registry` in a lazy global, reached through one
//! accessor function.

pub mod types;
#[allow(clippy::module_inception)]
pub mod registry;
pub mod error;

pub use types::*;
pub use registry::*;
pub use error::*;
