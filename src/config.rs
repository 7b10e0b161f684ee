//! Realm configuration.

use serde::{Deserialize, Serialize};

use crate::types::{ServiceId, Tenant};

/// Default attribute name carrying the remember-me flag.
pub const DEFAULT_REMEMBER_ME_ATTRIBUTE: &str = "rememberMe";

/// Default identity cache TTL in seconds (1 hour).
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;

/// Realm configuration.
///
/// Immutable per deployment: the service identifier and tenant are fixed at
/// startup, so a realm answers for exactly one protected service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmConfig {
    /// Identifier of the protected service, sent with every validation call.
    pub service: ServiceId,
    /// Tenant (backend server/application) the user profiles belong to.
    pub tenant: Tenant,
    /// Name of the validator attribute carrying the remember-me flag.
    #[serde(default = "default_remember_me_attribute")]
    pub remember_me_attribute: String,
    /// How long a cached identity stays live, in seconds.
    ///
    /// Zero is allowed and makes every cached entry expire immediately,
    /// which effectively disables identity caching.
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
}

fn default_remember_me_attribute() -> String {
    DEFAULT_REMEMBER_ME_ATTRIBUTE.to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECONDS
}

impl RealmConfig {
    /// Create a config for the given service and tenant with default
    /// remember-me attribute name and cache TTL.
    pub fn new(service: impl Into<ServiceId>, tenant: impl Into<Tenant>) -> Self {
        Self {
            service: service.into(),
            tenant: tenant.into(),
            remember_me_attribute: default_remember_me_attribute(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
        }
    }

    /// Override the remember-me attribute name.
    pub fn with_remember_me_attribute(mut self, name: impl Into<String>) -> Self {
        self.remember_me_attribute = name.into();
        self
    }

    /// Override the identity cache TTL.
    pub fn with_cache_ttl_seconds(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }
}
