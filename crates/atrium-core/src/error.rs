//! Error types and result aliases for Atrium.
//!
//! This module defines the shared error types used across all Atrium
//! components. Errors are structured for programmatic handling: the manager
//! layer branches on variants rather than on message text.

use crate::entity::EntityType;

/// The result type used throughout Atrium.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Atrium operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The entity addressed by a natural key was not found.
    #[error("{entity_type} {name} does not exist")]
    EntityNotFound {
        /// The type of entity that was looked up.
        entity_type: EntityType,
        /// The natural name that was looked up.
        name: String,
    },

    /// An entity with the same natural key already exists.
    ///
    /// Raised only by conditional writes; the store guarantees no partial
    /// write occurred.
    #[error("{entity_type} {name} already exists")]
    EntityAlreadyExists {
        /// The type of the conflicting entity.
        entity_type: EntityType,
        /// The natural name that collided.
        name: String,
    },

    /// An internal string-identifier token could not be decoded.
    ///
    /// Indicates data corruption or a programming bug, not a normal runtime
    /// condition.
    #[error("malformed string identifier: {message}")]
    MalformedIdentifier {
        /// Description of what made the token invalid.
        message: String,
    },

    /// Caller-supplied properties already use a reserved internal key.
    #[error("property key '{key}' is reserved for internal use")]
    ReservedKeyConflict {
        /// The reserved key found in the caller's map.
        key: String,
    },

    /// The identity source could not produce a new id.
    #[error("identity generation failed: {message}")]
    IdentityGeneration {
        /// Description of the failure.
        message: String,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// A storage operation failed.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred that should not happen in normal operation.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl Error {
    /// Creates an entity-not-found error for the given identifier parts.
    #[must_use]
    pub fn not_found(entity_type: EntityType, name: impl Into<String>) -> Self {
        Self::EntityNotFound {
            entity_type,
            name: name.into(),
        }
    }

    /// Creates an entity-already-exists error for the given identifier parts.
    #[must_use]
    pub fn already_exists(entity_type: EntityType, name: impl Into<String>) -> Self {
        Self::EntityAlreadyExists {
            entity_type,
            name: name.into(),
        }
    }

    /// Creates a new storage error with the given message.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new storage error with a source cause.
    #[must_use]
    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new serialization error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_entity() {
        let err = Error::not_found(EntityType::User, "alice");
        assert_eq!(err.to_string(), "User alice does not exist");
    }

    #[test]
    fn already_exists_message_names_the_entity() {
        let err = Error::already_exists(EntityType::Role, "reader");
        assert_eq!(err.to_string(), "Role reader already exists");
    }

    #[test]
    fn storage_error_carries_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = Error::storage_with_source("put failed", io);
        let source = std::error::Error::source(&err).expect("source should be set");
        assert!(source.to_string().contains("disk on fire"));
    }
}
