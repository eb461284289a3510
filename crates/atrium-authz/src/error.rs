//! Caller-facing error taxonomy for access control operations.
//!
//! Callers branch on variants: existence violations name the missing
//! entity, uniqueness violations name the duplicate, and everything else
//! crosses the manager boundary unchanged from the core layer.

use atrium_core::{EntityType, Error};

/// Result type alias for access control operations.
pub type Result<T> = std::result::Result<T, AuthzError>;

/// Errors surfaced by the access control manager.
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The addressed tenant does not exist.
    #[error("Metalake {name} does not exist")]
    NoSuchMetalake {
        /// The missing tenant name.
        name: String,
    },

    /// The addressed user does not exist.
    #[error("User {name} does not exist")]
    NoSuchUser {
        /// The missing user name.
        name: String,
    },

    /// The addressed group does not exist.
    #[error("Group {name} does not exist")]
    NoSuchGroup {
        /// The missing group name.
        name: String,
    },

    /// The addressed role does not exist.
    #[error("Role {name} does not exist")]
    NoSuchRole {
        /// The missing role name.
        name: String,
    },

    /// A user with this name already exists in the tenant.
    #[error("User {name} already exists")]
    UserAlreadyExists {
        /// The duplicate user name.
        name: String,
    },

    /// A group with this name already exists in the tenant.
    #[error("Group {name} already exists")]
    GroupAlreadyExists {
        /// The duplicate group name.
        name: String,
    },

    /// A role with this name already exists in the tenant.
    #[error("Role {name} already exists")]
    RoleAlreadyExists {
        /// The duplicate role name.
        name: String,
    },

    /// A core-layer failure (storage, serialization, malformed input)
    /// propagated unchanged.
    #[error(transparent)]
    Core(#[from] Error),
}

impl AuthzError {
    /// Maps store-level existence and uniqueness errors onto the typed
    /// caller-facing variants; everything else passes through.
    #[must_use]
    pub(crate) fn from_store(err: Error) -> Self {
        match err {
            Error::EntityNotFound { entity_type, name } => match entity_type {
                EntityType::Metalake => Self::NoSuchMetalake { name },
                EntityType::User => Self::NoSuchUser { name },
                EntityType::Group => Self::NoSuchGroup { name },
                EntityType::Role => Self::NoSuchRole { name },
            },
            Error::EntityAlreadyExists { entity_type, name } => match entity_type {
                EntityType::User => Self::UserAlreadyExists { name },
                EntityType::Group => Self::GroupAlreadyExists { name },
                EntityType::Role => Self::RoleAlreadyExists { name },
                EntityType::Metalake => Self::Core(Error::already_exists(entity_type, name)),
            },
            other => Self::Core(other),
        }
    }
}
