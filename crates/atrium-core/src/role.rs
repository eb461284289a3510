//! Roles, securable objects, and privileges.
//!
//! A role bundles grants: each grant targets a securable object (a resource
//! scope such as a catalog or table) and carries the privileges allowed on
//! it. Securable objects are immutable values embedded in roles, never
//! persisted on their own. Catalog connectors supply them when building
//! roles; the only one the core produces itself is the all-catalogs
//! wildcard.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::audit::AuditInfo;
use crate::error::{Error, Result};
use crate::id::EntityId;

/// An enumerated capability attached to a securable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum Privilege {
    /// Read the object's data and metadata.
    Read,
    /// Write the object's data and metadata.
    Write,
    /// Administer the object, including its grants.
    Manage,
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Manage => "MANAGE",
        };
        write!(f, "{s}")
    }
}

/// The resource scope a grant applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurableScope {
    /// Every catalog in the tenant, present and future.
    AllCatalogs,
    /// One catalog.
    Catalog {
        /// The catalog name.
        name: String,
    },
    /// One schema inside a catalog.
    Schema {
        /// The owning catalog.
        catalog: String,
        /// The schema name.
        schema: String,
    },
    /// One table inside a schema.
    Table {
        /// The owning catalog.
        catalog: String,
        /// The owning schema.
        schema: String,
        /// The table name.
        table: String,
    },
}

impl fmt::Display for SecurableScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllCatalogs => write!(f, "*"),
            Self::Catalog { name } => write!(f, "{name}"),
            Self::Schema { catalog, schema } => write!(f, "{catalog}.{schema}"),
            Self::Table {
                catalog,
                schema,
                table,
            } => write!(f, "{catalog}.{schema}.{table}"),
        }
    }
}

/// A policy target: a resource scope plus the privileges granted on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurableObject {
    scope: SecurableScope,
    privileges: Vec<Privilege>,
}

impl SecurableObject {
    /// The wildcard object covering all catalogs.
    #[must_use]
    pub fn all_catalogs() -> Self {
        Self {
            scope: SecurableScope::AllCatalogs,
            privileges: Vec::new(),
        }
    }

    /// An object targeting one catalog.
    #[must_use]
    pub fn catalog(name: impl Into<String>) -> Self {
        Self {
            scope: SecurableScope::Catalog { name: name.into() },
            privileges: Vec::new(),
        }
    }

    /// An object targeting one schema.
    #[must_use]
    pub fn schema(catalog: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            scope: SecurableScope::Schema {
                catalog: catalog.into(),
                schema: schema.into(),
            },
            privileges: Vec::new(),
        }
    }

    /// An object targeting one table.
    #[must_use]
    pub fn table(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            scope: SecurableScope::Table {
                catalog: catalog.into(),
                schema: schema.into(),
                table: table.into(),
            },
            privileges: Vec::new(),
        }
    }

    /// Builds a copy carrying the given privileges.
    #[must_use]
    pub fn with_privileges(mut self, privileges: Vec<Privilege>) -> Self {
        self.privileges = privileges;
        self
    }

    /// The resource scope.
    #[must_use]
    pub fn scope(&self) -> &SecurableScope {
        &self.scope
    }

    /// The privileges granted on the scope.
    #[must_use]
    pub fn privileges(&self) -> &[Privilege] {
        &self.privileges
    }
}

impl fmt::Display for SecurableObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scope)
    }
}

/// A named bundle of grants, unique by name within its tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: EntityId,
    name: String,
    properties: HashMap<String, String>,
    securable_objects: Vec<SecurableObject>,
    audit: AuditInfo,
}

impl Role {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> RoleBuilder {
        RoleBuilder::default()
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

    /// The grants bundled in this role.
    #[must_use]
    pub fn securable_objects(&self) -> &[SecurableObject] {
        &self.securable_objects
    }

    /// Creation provenance.
    #[must_use]
    pub fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    /// Builds a copy with a replaced property map.
    #[must_use]
    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }
}

/// Builder for [`Role`] values.
#[derive(Debug, Default)]
pub struct RoleBuilder {
    id: Option<EntityId>,
    name: Option<String>,
    properties: HashMap<String, String>,
    securable_objects: Vec<SecurableObject>,
    audit: Option<AuditInfo>,
}

impl RoleBuilder {
    /// Sets the surrogate id.
    #[must_use]
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the role name.
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

    /// Sets the bundled grants.
    #[must_use]
    pub fn securable_objects(mut self, securable_objects: Vec<SecurableObject>) -> Self {
        self.securable_objects = securable_objects;
        self
    }

    /// Sets the audit stamp.
    #[must_use]
    pub fn audit(mut self, audit: AuditInfo) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Builds the role.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a required field is missing.
    pub fn try_build(self) -> Result<Role> {
        Ok(Role {
            id: self.id.ok_or_else(|| missing("id"))?,
            name: self.name.ok_or_else(|| missing("name"))?,
            properties: self.properties,
            securable_objects: self.securable_objects,
            audit: self.audit.ok_or_else(|| missing("audit"))?,
        })
    }
}

fn missing(field: &str) -> Error {
    Error::InvalidInput(format!("role requires a {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_renders_dotted_paths() {
        assert_eq!(SecurableObject::all_catalogs().to_string(), "*");
        assert_eq!(SecurableObject::catalog("sales").to_string(), "sales");
        assert_eq!(
            SecurableObject::schema("sales", "eu").to_string(),
            "sales.eu"
        );
        assert_eq!(
            SecurableObject::table("sales", "eu", "orders").to_string(),
            "sales.eu.orders"
        );
    }

    #[test]
    fn with_privileges_attaches_capabilities() {
        let object =
            SecurableObject::all_catalogs().with_privileges(vec![Privilege::Read, Privilege::Write]);
        assert_eq!(object.privileges(), [Privilege::Read, Privilege::Write]);
    }

    #[test]
    fn role_keeps_grant_order() {
        let role = Role::builder()
            .id(EntityId::new(5))
            .name("reader")
            .securable_objects(vec![
                SecurableObject::catalog("a"),
                SecurableObject::catalog("b"),
            ])
            .audit(AuditInfo::now("test"))
            .try_build()
            .expect("build should succeed");
        let names: Vec<String> = role
            .securable_objects()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn privilege_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&Privilege::Manage).expect("serialize");
        assert_eq!(json, "\"MANAGE\"");
    }
}
