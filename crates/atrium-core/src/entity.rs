//! Entity typing, identification, and the closed persisted-entity set.
//!
//! The cross-backend natural key of every stored entity is
//! `(scope, entity type, name)`. [`EntityIdent`] renders that key in the
//! `key=value` path convention so in-memory maps, object stores, and
//! relational tables can all address entities uniformly.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::metalake::Metalake;
use crate::principal::{Group, User};
use crate::role::Role;

/// Schema version tag carried by tenant roots for forward compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SchemaVersion {
    /// The initial entity schema.
    #[serde(rename = "v0.1")]
    V0_1,
}

impl SchemaVersion {
    /// Major component of the version.
    #[must_use]
    pub const fn major(self) -> u32 {
        match self {
            Self::V0_1 => 0,
        }
    }

    /// Minor component of the version.
    #[must_use]
    pub const fn minor(self) -> u32 {
        match self {
            Self::V0_1 => 1,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major(), self.minor())
    }
}

/// Type tag distinguishing the persisted entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// A tenant root.
    Metalake,
    /// A user principal.
    User,
    /// A group principal.
    Group,
    /// An authorization role.
    Role,
}

impl EntityType {
    /// Path segment grouping entities of this type under a scope.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Metalake => "metalakes",
            Self::User => "users",
            Self::Group => "groups",
            Self::Role => "roles",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Metalake => "Metalake",
            Self::User => "User",
            Self::Group => "Group",
            Self::Role => "Role",
        };
        write!(f, "{s}")
    }
}

/// The namespace an entity lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The store root, where tenant entities themselves live.
    Root,
    /// Inside the named tenant.
    Metalake(String),
}

impl Scope {
    /// Storage-key prefix shared by all entities of one type in this scope.
    #[must_use]
    pub fn key_prefix(&self, entity_type: EntityType) -> String {
        match self {
            Self::Root => format!("{}/", entity_type.path_segment()),
            Self::Metalake(name) => format!("metalake={name}/{}/", entity_type.path_segment()),
        }
    }
}

/// The typed natural key of a stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityIdent {
    scope: Scope,
    entity_type: EntityType,
    name: String,
}

impl EntityIdent {
    /// Identifier of a tenant root.
    #[must_use]
    pub fn metalake(name: impl Into<String>) -> Self {
        Self {
            scope: Scope::Root,
            entity_type: EntityType::Metalake,
            name: name.into(),
        }
    }

    /// Identifier of a user inside a tenant.
    #[must_use]
    pub fn user(metalake: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: Scope::Metalake(metalake.into()),
            entity_type: EntityType::User,
            name: name.into(),
        }
    }

    /// Identifier of a group inside a tenant.
    #[must_use]
    pub fn group(metalake: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: Scope::Metalake(metalake.into()),
            entity_type: EntityType::Group,
            name: name.into(),
        }
    }

    /// Identifier of a role inside a tenant.
    #[must_use]
    pub fn role(metalake: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: Scope::Metalake(metalake.into()),
            entity_type: EntityType::Role,
            name: name.into(),
        }
    }

    /// The scope part of the key.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The type part of the key.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// The natural name part of the key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders the full cross-backend storage key.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{}{}", self.scope.key_prefix(self.entity_type), self.name)
    }
}

impl fmt::Display for EntityIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

/// The closed set of entities the store persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    /// A tenant root.
    Metalake(Metalake),
    /// A user principal.
    User(User),
    /// A group principal.
    Group(Group),
    /// An authorization role.
    Role(Role),
}

impl Entity {
    /// The type tag of the wrapped entity.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Metalake(_) => EntityType::Metalake,
            Self::User(_) => EntityType::User,
            Self::Group(_) => EntityType::Group,
            Self::Role(_) => EntityType::Role,
        }
    }

    /// The natural name of the wrapped entity.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Metalake(m) => m.name(),
            Self::User(u) => u.name(),
            Self::Group(g) => g.name(),
            Self::Role(r) => r.name(),
        }
    }

    /// Unwraps a metalake.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the entity is of a different type.
    pub fn into_metalake(self) -> Result<Metalake> {
        match self {
            Self::Metalake(m) => Ok(m),
            other => Err(type_mismatch(EntityType::Metalake, &other)),
        }
    }

    /// Unwraps a user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the entity is of a different type.
    pub fn into_user(self) -> Result<User> {
        match self {
            Self::User(u) => Ok(u),
            other => Err(type_mismatch(EntityType::User, &other)),
        }
    }

    /// Unwraps a group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the entity is of a different type.
    pub fn into_group(self) -> Result<Group> {
        match self {
            Self::Group(g) => Ok(g),
            other => Err(type_mismatch(EntityType::Group, &other)),
        }
    }

    /// Unwraps a role.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the entity is of a different type.
    pub fn into_role(self) -> Result<Role> {
        match self {
            Self::Role(r) => Ok(r),
            other => Err(type_mismatch(EntityType::Role, &other)),
        }
    }
}

fn type_mismatch(expected: EntityType, got: &Entity) -> Error {
    Error::internal(format!(
        "expected a {expected} entity, found {} {}",
        got.entity_type(),
        got.name()
    ))
}
