//! Entity store contract and the in-memory backend.
//!
//! The store is the only component that touches physical storage. The
//! contract is storage-agnostic: in-memory maps, relational tables, and
//! distributed key-value backends are all valid implementers, addressed
//! through the `(scope, type, name)` natural key of [`EntityIdent`].
//!
//! The single primitive that makes concurrent "create if absent" race-free
//! is `put` with `overwrite = false`: it must provide at-most-one-winner
//! semantics per natural key. No caller may substitute a separate
//! exists-check followed by a write.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::entity::{Entity, EntityIdent, EntityType, Scope};
use crate::error::{Error, Result};

/// Serialization strategy for an entity's bytes-on-disk representation.
///
/// Installed into a store via [`EntityStore::set_serde`]. Backends that
/// persist bytes require one; in-memory backends may run without.
pub trait EntitySerDe: Send + Sync {
    /// Encodes an entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the entity cannot be encoded.
    fn serialize(&self, entity: &Entity) -> Result<Bytes>;

    /// Decodes an entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the bytes cannot be decoded.
    fn deserialize(&self, bytes: &Bytes) -> Result<Entity>;
}

/// JSON transcoding via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEntitySerDe;

impl EntitySerDe for JsonEntitySerDe {
    fn serialize(&self, entity: &Entity) -> Result<Bytes> {
        serde_json::to_vec(entity)
            .map(Bytes::from)
            .map_err(|e| Error::serialization(format!("entity encode failed: {e}")))
    }

    fn deserialize(&self, bytes: &Bytes) -> Result<Entity> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::serialization(format!("entity decode failed: {e}")))
    }
}

/// One-time setup inputs for a store backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend location (connection string, directory, ...). Ignored by
    /// backends that need none.
    #[serde(default)]
    pub path: Option<String>,
}

/// Storage-agnostic persistence contract for catalog entities.
///
/// Implementations must be safe for concurrent use from many request
/// threads; the manager layer holds no locks of its own.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// One-time backend setup. Idempotent only at process start.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the backend cannot be reached or
    /// prepared.
    async fn initialize(&self, config: &StoreConfig) -> Result<()>;

    /// Installs the serialization strategy.
    ///
    /// `None` is permitted only for in-memory backends that need no
    /// transcoding.
    fn set_serde(&self, serde: Option<Arc<dyn EntitySerDe>>);

    /// Fetches an entity by natural key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntityNotFound`] when absent.
    async fn get(&self, ident: &EntityIdent) -> Result<Entity>;

    /// Persists an entity under its natural key.
    ///
    /// Atomic: with `overwrite = false` and an occupied key, fails with
    /// [`Error::EntityAlreadyExists`] and performs no write. With
    /// `overwrite = true`, replaces and returns the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntityAlreadyExists`] on a conditional-write
    /// collision, [`Error::InvalidInput`] if the entity does not match the
    /// identifier, or [`Error::Storage`] / [`Error::Serialization`] on
    /// backend failure.
    async fn put(
        &self,
        ident: &EntityIdent,
        entity: Entity,
        overwrite: bool,
    ) -> Result<Option<Entity>>;

    /// Deletes an entity by natural key.
    ///
    /// Returns whether an entity was actually removed; absence is `false`,
    /// never an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on backend failure.
    async fn delete(&self, ident: &EntityIdent) -> Result<bool>;

    /// Lists all entities of one type in a scope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on backend failure.
    async fn list(&self, scope: &Scope, entity_type: EntityType) -> Result<Vec<Entity>>;

    /// Releases backend resources. Safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if release fails.
    async fn close(&self) -> Result<()>;
}

/// What the in-memory backend holds per key: the entity value directly, or
/// its transcoded form when a serde is installed.
enum Stored {
    Value(Entity),
    Encoded(Bytes),
}

/// In-memory entity store.
///
/// Thread-safe via `RwLock`; every conditional write runs its precondition
/// check and insert under a single write-lock acquisition, which is what
/// gives `put(overwrite = false)` its at-most-one-winner guarantee. When a
/// serde is installed, entities round-trip through it so the backend
/// exercises the same transcoding path as byte-oriented stores.
#[derive(Default)]
pub struct InMemoryEntityStore {
    entities: RwLock<HashMap<String, Stored>>,
    serde: RwLock<Option<Arc<dyn EntitySerDe>>>,
}

impl InMemoryEntityStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn decode(&self, stored: &Stored) -> Result<Entity> {
        match stored {
            Stored::Value(entity) => Ok(entity.clone()),
            Stored::Encoded(bytes) => {
                let serde = self.serde.read().map_err(|_| Error::internal("lock poisoned"))?;
                let serde = serde
                    .as_ref()
                    .ok_or_else(|| Error::internal("encoded entity but no serde installed"))?
                    .clone();
                serde.deserialize(bytes)
            }
        }
    }

    fn encode(&self, entity: Entity) -> Result<Stored> {
        let serde = self.serde.read().map_err(|_| Error::internal("lock poisoned"))?;
        match serde.as_ref() {
            Some(serde) => Ok(Stored::Encoded(serde.serialize(&entity)?)),
            None => Ok(Stored::Value(entity)),
        }
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn initialize(&self, config: &StoreConfig) -> Result<()> {
        if let Some(path) = &config.path {
            tracing::debug!(path = %path, "in-memory store ignores backend path");
        }
        tracing::debug!("in-memory entity store initialized");
        Ok(())
    }

    fn set_serde(&self, serde: Option<Arc<dyn EntitySerDe>>) {
        match self.serde.write() {
            Ok(mut guard) => *guard = serde,
            Err(poisoned) => *poisoned.into_inner() = serde,
        }
    }

    async fn get(&self, ident: &EntityIdent) -> Result<Entity> {
        let entities = self
            .entities
            .read()
            .map_err(|_| Error::internal("lock poisoned"))?;
        let stored = entities
            .get(&ident.storage_key())
            .ok_or_else(|| Error::not_found(ident.entity_type(), ident.name()))?;
        self.decode(stored)
    }

    async fn put(
        &self,
        ident: &EntityIdent,
        entity: Entity,
        overwrite: bool,
    ) -> Result<Option<Entity>> {
        if entity.entity_type() != ident.entity_type() || entity.name() != ident.name() {
            return Err(Error::InvalidInput(format!(
                "entity {} {} does not match identifier {ident}",
                entity.entity_type(),
                entity.name()
            )));
        }
        let encoded = self.encode(entity)?;

        let previous = {
            let mut entities = self
                .entities
                .write()
                .map_err(|_| Error::internal("lock poisoned"))?;
            let key = ident.storage_key();
            if !overwrite && entities.contains_key(&key) {
                return Err(Error::already_exists(ident.entity_type(), ident.name()));
            }
            entities.insert(key, encoded)
        };

        previous.map(|stored| self.decode(&stored)).transpose()
    }

    async fn delete(&self, ident: &EntityIdent) -> Result<bool> {
        let removed = self
            .entities
            .write()
            .map_err(|_| Error::internal("lock poisoned"))?
            .remove(&ident.storage_key());
        Ok(removed.is_some())
    }

    async fn list(&self, scope: &Scope, entity_type: EntityType) -> Result<Vec<Entity>> {
        let prefix = scope.key_prefix(entity_type);
        let entities = self
            .entities
            .read()
            .map_err(|_| Error::internal("lock poisoned"))?;
        entities
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, stored)| self.decode(stored))
            .collect()
    }

    async fn close(&self) -> Result<()> {
        self.entities
            .write()
            .map_err(|_| Error::internal("lock poisoned"))?
            .clear();
        tracing::debug!("in-memory entity store closed");
        Ok(())
    }
}

impl Drop for InMemoryEntityStore {
    fn drop(&mut self) {
        tracing::debug!("in-memory entity store dropped");
    }
}
