use std::fmt;

use thiserror::Error;

use super::EntityId;

/// Errors that can occur when creating or looking up registry entities.
///
/// A failed call never changes registry state: no id is consumed and no
/// entry is added or removed.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No creation strategy is registered for the requested tag.
    #[error("unknown {family} kind '{tag}'")]
    UnknownKind { family: &'static str, tag: String },

    /// Supplied attributes are missing or failed validation.
    #[error("invalid attributes for {kind}: {reason}")]
    InvalidAttributes { kind: String, reason: String },

    /// The id about to be assigned is already present. Unreachable while the
    /// counter bookkeeping is correct; treat as an internal-consistency fault.
    #[error("duplicate identifier {0}")]
    DuplicateIdentifier(EntityId),

    /// No live entity carries this id.
    #[error("no entity with identifier {0}")]
    UnknownEntity(EntityId),

    /// A generic internal error, e.g. a poisoned lock.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    pub fn invalid(kind: &dyn fmt::Display, reason: impl Into<String>) -> Self {
        RegistryError::InvalidAttributes {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unknown_kind(family: &'static str, tag: &str) -> Self {
        RegistryError::UnknownKind {
            family,
            tag: tag.to_string(),
        }
    }
}
