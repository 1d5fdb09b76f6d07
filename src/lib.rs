//! In-process entity registries: id assignment, creation-order storage,
//! lookup, kind-keyed factories and process-wide singletons.

pub mod config;
pub mod registry;
pub mod logger;
pub mod employees;
pub mod notifications;
pub mod playlist;

pub use registry::{Attributes, Entity, EntityId, EntityKind, Registry, RegistryError};
