//! Access control configuration.
//!
//! The service-admin list is configuration, not entity data: it is loaded
//! once at process start and consulted for a fast-path admin check that
//! never touches storage. The config is an explicitly constructed value
//! passed into the manager, so isolated manager instances (tests,
//! multi-instance deployments) carry independent admin sets.

use serde::{Deserialize, Serialize};

/// Environment variable listing service administrators, comma-separated.
pub const SERVICE_ADMINS_ENV: &str = "ATRIUM_SERVICE_ADMINS";

/// Configuration for the access control manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthzConfig {
    /// Names of the process-wide service administrators.
    ///
    /// Disjoint from tenant-scoped users; immutable for the process
    /// lifetime.
    #[serde(default)]
    pub service_admins: Vec<String>,
}

impl AuthzConfig {
    /// Builds a config with the given service-admin names.
    #[must_use]
    pub fn with_service_admins<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            service_admins: admins.into_iter().map(Into::into).collect(),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Supported env vars:
    /// - `ATRIUM_SERVICE_ADMINS` (comma-separated admin names)
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(admins) = env_string(SERVICE_ADMINS_ENV) {
            config.service_admins = parse_admin_list(&admins);
        }
        config
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_admin_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
