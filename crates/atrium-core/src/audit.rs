//! Audit stamps for persisted entities.
//!
//! Every stored entity records who created it and when. The stamp is an
//! immutable value fixed at construction; modification tracking beyond
//! creation is a storage-backend concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation provenance attached to every entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    creator: String,
    created_at: DateTime<Utc>,
}

impl AuditInfo {
    /// Creates a stamp for the given creator at the current instant.
    #[must_use]
    pub fn now(creator: impl Into<String>) -> Self {
        Self {
            creator: creator.into(),
            created_at: Utc::now(),
        }
    }

    /// Creates a stamp with an explicit creation time.
    ///
    /// Used when rehydrating entities whose provenance was recorded
    /// elsewhere.
    #[must_use]
    pub fn new(creator: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            creator: creator.into(),
            created_at,
        }
    }

    /// The identity that created the entity.
    #[must_use]
    pub fn creator(&self) -> &str {
        &self.creator
    }

    /// When the entity was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
