//! Surrogate identity generation for catalog entities.
//!
//! Every persisted entity carries a numeric surrogate id distinct from its
//! caller-facing natural name. Generators must be safe for concurrent calls
//! with no caller-visible coordination; uniqueness of `(scope, name)` plus
//! the id is what lets relational backends key rows without natural-name
//! joins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A numeric surrogate identifier for a stored entity.
///
/// Ids stay within the positive `i64` range so relational backends can
/// store them in signed 64-bit columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an entity id from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|e| Error::InvalidInput(format!("invalid entity id '{s}': {e}")))
    }
}

/// Source of new surrogate identifiers.
///
/// Implementations must be safe to call from many threads at once. The only
/// expected failure is exhaustion or unavailability of the underlying
/// source, surfaced as [`Error::IdentityGeneration`].
pub trait IdGenerator: Send + Sync {
    /// Produces the next unique identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdentityGeneration`] if the underlying source
    /// cannot produce an id.
    fn next_id(&self) -> Result<EntityId>;
}

/// Identity generator backed by the process-wide entropy source.
///
/// Draws 64 random bits per id and clears the sign bit. With a 63-bit space
/// and ids always paired with a `(scope, name)` natural key, collisions are
/// not a practical concern for the lifetime of a store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    /// Creates a new random identity generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> Result<EntityId> {
        Ok(EntityId::new(rand::random::<u64>() & (i64::MAX as u64)))
    }
}
