//! # atrium-core
//!
//! Core contracts for the Atrium metadata catalog.
//!
//! This crate provides the foundational types and traits shared across all
//! Atrium components:
//!
//! - **Entity Model**: Immutable value types for tenants, principals, and
//!   roles, each carrying an audit stamp and a schema version where needed
//! - **Entity Store**: The storage-agnostic persistence contract with an
//!   atomic create-if-absent primitive, plus the in-memory backend
//! - **Identifiers**: Numeric surrogate-id generation and the string
//!   identifier codec that embeds ids into property maps
//! - **Error Types**: Shared error definitions and result types
//! - **Observability**: Structured-logging initialization helpers
//!
//! ## Crate Boundary
//!
//! `atrium-core` is the **only** crate allowed to define shared primitives.
//! Orchestration layers (such as the access control manager) depend on the
//! contracts here and never on a concrete backend.
//!
//! ## Example
//!
//! ```rust
//! use atrium_core::prelude::*;
//!
//! let generator = RandomIdGenerator::new();
//! let id = generator.next_id().unwrap();
//! let ident = StringIdentifier::from_id(id);
//! assert!(ident.encode().starts_with("atrium.v1.uid"));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod audit;
pub mod entity;
pub mod error;
pub mod id;
pub mod ident;
pub mod metalake;
pub mod observability;
pub mod principal;
pub mod role;
pub mod store;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use atrium_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::audit::AuditInfo;
    pub use crate::entity::{Entity, EntityIdent, EntityType, SchemaVersion, Scope};
    pub use crate::error::{Error, Result};
    pub use crate::id::{EntityId, IdGenerator, RandomIdGenerator};
    pub use crate::ident::{ID_KEY, StringIdentifier};
    pub use crate::metalake::Metalake;
    pub use crate::principal::{Group, User};
    pub use crate::role::{Privilege, Role, SecurableObject, SecurableScope};
    pub use crate::store::{
        EntitySerDe, EntityStore, InMemoryEntityStore, JsonEntitySerDe, StoreConfig,
    };
}

// Re-export key types at crate root for ergonomics
pub use audit::AuditInfo;
pub use entity::{Entity, EntityIdent, EntityType, SchemaVersion, Scope};
pub use error::{Error, Result};
pub use id::{EntityId, IdGenerator, RandomIdGenerator};
pub use ident::{ID_KEY, StringIdentifier};
pub use metalake::Metalake;
pub use observability::{LogFormat, init_logging};
pub use principal::{Group, User};
pub use role::{Privilege, Role, SecurableObject, SecurableScope};
pub use store::{EntitySerDe, EntityStore, InMemoryEntityStore, JsonEntitySerDe, StoreConfig};
