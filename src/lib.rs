//! Single-sign-on ticket realm.
//!
//! Authenticates end users against a central ticket-validation service and
//! authorizes their access from roles and permissions fetched from a
//! user-profile directory. The expensive, network-bound authentication runs
//! once per ticket; the resulting identity is cached and every later access
//! check is a pure in-memory projection.
//!
//! ## Usage
//!
//! ```ignore
//! let realm = ticket_realm::create_realm(
//!     RealmConfig::new("app1", "portal"),
//!     "https://sso.example.com/validate",
//!     "https://sys.example.com/api/",
//! )?;
//!
//! // On login: validate the ticket and cache the identity.
//! let session = realm.establish(&Ticket::new("ST-123")).await?;
//!
//! // On each access check: answered from the cache, no network.
//! let grant = realm.grant_for(&Principal::new("alice")).await;
//! ```

// Core modules
mod authn;
mod authz;
mod cache;
mod config;
mod directory;
mod error;
mod identity;
mod realm;
mod types;
mod validator;

// Re-export key types
pub use authn::Authenticator;
pub use authz::{AuthorizationGrant, Authorizer};
pub use cache::{CacheKey, IdentityCache, MemoryIdentityCache};
pub use config::{DEFAULT_CACHE_TTL_SECONDS, DEFAULT_REMEMBER_ME_ATTRIBUTE, RealmConfig};
pub use directory::{DEFAULT_LOOKUP_TIMEOUT_SECONDS, DirectoryError, RestUserDirectory, UserDirectory};
pub use error::{AuthError, AuthResult, CollaboratorError, ErrorSource};
pub use identity::{Attributes, Authenticated, AuthenticatedIdentity, Menu, UserRecord};
pub use realm::Realm;
pub use types::{Principal, ServiceId, Tenant, Ticket};
pub use validator::{
    DEFAULT_VALIDATE_TIMEOUT_SECONDS, RestTicketValidator, TicketValidator, ValidationError,
    ValidationResult,
};

use std::sync::Arc;

use anyhow::Result;

/// Convenience function to create a fully wired realm.
///
/// Builds REST clients for the ticket validation endpoint and the user
/// directory base URL, pairs them with an in-memory identity cache, and
/// assembles the [`Realm`]. Hosts with their own collaborators construct
/// [`Authenticator`] and [`Realm`] directly instead.
pub fn create_realm(
    config: RealmConfig,
    validate_endpoint: &str,
    directory_base: &str,
) -> Result<Arc<Realm>> {
    let validator = Arc::new(RestTicketValidator::new(validate_endpoint)?);
    let directory = Arc::new(RestUserDirectory::new(directory_base)?);

    let authenticator = Authenticator::new(validator, directory, config);
    let realm = Realm::new(authenticator, Arc::new(MemoryIdentityCache::new()));

    Ok(Arc::new(realm))
}
