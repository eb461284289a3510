//! The tenant root entity.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::audit::AuditInfo;
use crate::entity::SchemaVersion;
use crate::error::{Error, Result};
use crate::id::EntityId;

/// A tenant/namespace root scoping all principals, roles, and catalogs.
///
/// Created explicitly before any principal or role operation targets it.
/// All attributes are fixed at construction; updates build a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metalake {
    id: EntityId,
    name: String,
    properties: HashMap<String, String>,
    audit: AuditInfo,
    version: SchemaVersion,
}

impl Metalake {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> MetalakeBuilder {
        MetalakeBuilder::default()
    }

    /// The surrogate id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The globally unique, case-sensitive tenant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The free-form property map.
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Creation provenance.
    #[must_use]
    pub fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    /// The entity schema version.
    #[must_use]
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Builds a copy with a replaced property map.
    #[must_use]
    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }
}

/// Builder for [`Metalake`] values.
#[derive(Debug, Default)]
pub struct MetalakeBuilder {
    id: Option<EntityId>,
    name: Option<String>,
    properties: HashMap<String, String>,
    audit: Option<AuditInfo>,
    version: Option<SchemaVersion>,
}

impl MetalakeBuilder {
    /// Sets the surrogate id.
    #[must_use]
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the tenant name.
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

    /// Sets the audit stamp.
    #[must_use]
    pub fn audit(mut self, audit: AuditInfo) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Sets the schema version. Defaults to [`SchemaVersion::V0_1`].
    #[must_use]
    pub fn version(mut self, version: SchemaVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Builds the metalake.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a required field is missing.
    pub fn try_build(self) -> Result<Metalake> {
        Ok(Metalake {
            id: self.id.ok_or_else(|| missing("id"))?,
            name: self.name.ok_or_else(|| missing("name"))?,
            properties: self.properties,
            audit: self.audit.ok_or_else(|| missing("audit"))?,
            version: self.version.unwrap_or(SchemaVersion::V0_1),
        })
    }
}

fn missing(field: &str) -> Error {
    Error::InvalidInput(format!("metalake requires a {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_name() {
        let err = Metalake::builder()
            .id(EntityId::new(1))
            .audit(AuditInfo::now("test"))
            .try_build()
            .unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn builder_defaults_schema_version() {
        let metalake = Metalake::builder()
            .id(EntityId::new(1))
            .name("demo")
            .audit(AuditInfo::now("test"))
            .try_build()
            .expect("build should succeed");
        assert_eq!(metalake.version(), SchemaVersion::V0_1);
        assert!(metalake.properties().is_empty());
    }
}
