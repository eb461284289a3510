//! User and group principals.
//!
//! Principals are identities that can be granted roles. The role list on a
//! principal is a denormalized view of grants, not an authoritative
//! back-reference: grant changes build a new value via [`User::with_roles`]
//! / [`Group::with_roles`] rather than mutating in place. A freshly created
//! principal always starts with an empty role list.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::audit::AuditInfo;
use crate::error::{Error, Result};
use crate::id::EntityId;

/// A user principal, unique by name within its tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: EntityId,
    name: String,
    properties: HashMap<String, String>,
    roles: Vec<String>,
    audit: AuditInfo,
}

impl User {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// The surrogate id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The name, unique within the owning tenant.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The free-form property map.
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Names of the roles currently granted.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Creation provenance.
    #[must_use]
    pub fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    /// Builds a copy with a replaced role list.
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Builds a copy with a replaced property map.
    #[must_use]
    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }
}

/// Builder for [`User`] values.
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<EntityId>,
    name: Option<String>,
    properties: HashMap<String, String>,
    roles: Vec<String>,
    audit: Option<AuditInfo>,
}

impl UserBuilder {
    /// Sets the surrogate id.
    #[must_use]
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the principal name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the property map.
    #[must_use]
    pub fn properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// Sets the granted role names. Defaults to none.
    #[must_use]
    pub fn roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Sets the audit stamp.
    #[must_use]
    pub fn audit(mut self, audit: AuditInfo) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Builds the user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a required field is missing.
    pub fn try_build(self) -> Result<User> {
        Ok(User {
            id: self.id.ok_or_else(|| missing("user", "id"))?,
            name: self.name.ok_or_else(|| missing("user", "name"))?,
            properties: self.properties,
            roles: self.roles,
            audit: self.audit.ok_or_else(|| missing("user", "audit"))?,
        })
    }
}

/// A group principal, symmetric to [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: EntityId,
    name: String,
    properties: HashMap<String, String>,
    roles: Vec<String>,
    audit: AuditInfo,
}

impl Group {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> GroupBuilder {
        GroupBuilder::default()
    }

    /// The surrogate id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The name, unique within the owning tenant.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The free-form property map.
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Names of the roles currently granted.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Creation provenance.
    #[must_use]
    pub fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    /// Builds a copy with a replaced role list.
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Builds a copy with a replaced property map.
    #[must_use]
    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }
}

/// Builder for [`Group`] values.
#[derive(Debug, Default)]
pub struct GroupBuilder {
    id: Option<EntityId>,
    name: Option<String>,
    properties: HashMap<String, String>,
    roles: Vec<String>,
    audit: Option<AuditInfo>,
}

impl GroupBuilder {
    /// Sets the surrogate id.
    #[must_use]
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the principal name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the property map.
    #[must_use]
    pub fn properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// Sets the granted role names. Defaults to none.
    #[must_use]
    pub fn roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Sets the audit stamp.
    #[must_use]
    pub fn audit(mut self, audit: AuditInfo) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Builds the group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a required field is missing.
    pub fn try_build(self) -> Result<Group> {
        Ok(Group {
            id: self.id.ok_or_else(|| missing("group", "id"))?,
            name: self.name.ok_or_else(|| missing("group", "name"))?,
            properties: self.properties,
            roles: self.roles,
            audit: self.audit.ok_or_else(|| missing("group", "audit"))?,
        })
    }
}

fn missing(entity: &str, field: &str) -> Error {
    Error::InvalidInput(format!("{entity} requires a {field}"))
}
