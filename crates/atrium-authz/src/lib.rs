//! # atrium-authz
//!
//! Access control orchestration for the Atrium metadata catalog.
//!
//! This crate owns the lifecycle of principals (users, groups) and roles
//! scoped to tenants, plus the two-tier admin hierarchy:
//!
//! - **Access Control Manager**: A stateless façade over the entity store
//!   that validates tenant existence, enforces per-tenant name uniqueness
//!   through the store's atomic conditional put, and coordinates surrogate
//!   identity generation with writes
//! - **Service Admins**: Process-wide administrators defined by
//!   configuration, consulted without touching storage
//! - **Metalake Admins**: Tenant-scoped administrators persisted as user
//!   entities under a reserved system tenant
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use atrium_authz::{AccessControlManager, AuthzConfig};
//! use atrium_core::{InMemoryEntityStore, RandomIdGenerator};
//!
//! # async fn example() -> atrium_authz::Result<()> {
//! let manager = AccessControlManager::new(
//!     Arc::new(InMemoryEntityStore::new()),
//!     Arc::new(RandomIdGenerator::new()),
//!     &AuthzConfig::from_env(),
//! );
//! let user = manager.add_user("acme", "alice").await?;
//! assert!(user.roles().is_empty());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod manager;

pub use config::{AuthzConfig, SERVICE_ADMINS_ENV};
pub use error::{AuthzError, Result};
pub use manager::{AccessControlManager, SYSTEM_METALAKE};
