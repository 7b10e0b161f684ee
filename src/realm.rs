//! Realm facade: cache-aware authentication and authorization.
//!
//! The hosting request layer talks to the realm, not to the engines
//! directly: `establish` runs the expensive, network-bound authentication and
//! populates the identity cache; `grant_for` answers later access checks from
//! the cache alone; `logout` invalidates. A cache miss never re-derives an
//! identity from raw input — the caller must present a fresh ticket.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::authn::Authenticator;
use crate::authz::{AuthorizationGrant, Authorizer};
use crate::cache::{CacheKey, IdentityCache};
use crate::error::AuthResult;
use crate::identity::{Authenticated, AuthenticatedIdentity};
use crate::types::{Principal, Ticket};

/// A realm answering for one protected service.
pub struct Realm {
    authenticator: Authenticator,
    authorizer: Authorizer,
    cache: Arc<dyn IdentityCache>,
}

impl Realm {
    /// Assemble a realm from its engines and an identity cache.
    pub fn new(authenticator: Authenticator, cache: Arc<dyn IdentityCache>) -> Self {
        Self {
            authenticator,
            authorizer: Authorizer::new(),
            cache,
        }
    }

    /// Access the underlying authentication engine.
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    fn cache_key(&self, principal: &Principal) -> CacheKey {
        CacheKey::new(
            principal.clone(),
            self.authenticator.config().service.clone(),
        )
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.authenticator.config().cache_ttl_seconds)
    }

    /// Authenticate a ticket and cache the resulting identity.
    ///
    /// Returns `Ok(None)` for a blank ticket, like
    /// [`Authenticator::authenticate`]; nothing is cached in that case.
    pub async fn establish(&self, ticket: &Ticket) -> AuthResult<Option<Authenticated>> {
        let Some(outcome) = self.authenticator.authenticate(ticket).await? else {
            return Ok(None);
        };

        let principal = outcome.identity.principal().clone();
        self.cache
            .put(
                self.cache_key(&principal),
                outcome.identity.clone(),
                self.cache_ttl(),
            )
            .await;

        info!(principal = %principal, "Session established");
        Ok(Some(outcome))
    }

    /// Fetch the cached identity for a principal, if still live.
    pub async fn identity_for(&self, principal: &Principal) -> Option<AuthenticatedIdentity> {
        self.cache.get(&self.cache_key(principal)).await
    }

    /// Derive the authorization grant for a principal from the cache alone.
    ///
    /// `None` means no live identity: the caller must run a fresh
    /// [`Realm::establish`] with a new ticket before retrying.
    pub async fn grant_for(&self, principal: &Principal) -> Option<AuthorizationGrant> {
        match self.identity_for(principal).await {
            Some(identity) => Some(self.authorizer.authorize(&identity)),
            None => {
                debug!(principal = %principal, "No live identity for authorization check");
                None
            }
        }
    }

    /// Invalidate the cached identity for a principal.
    pub async fn logout(&self, principal: &Principal) {
        self.cache.invalidate(&self.cache_key(principal)).await;
        info!(principal = %principal, "Session invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryIdentityCache;
    use crate::config::RealmConfig;
    use crate::directory::{DirectoryError, UserDirectory};
    use crate::identity::{Attributes, UserRecord};
    use crate::types::{ServiceId, Tenant};
    use crate::validator::{TicketValidator, ValidationError, ValidationResult};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingValidator {
        calls: AtomicUsize,
    }

    impl TicketValidator for CountingValidator {
        fn validate<'a>(
            &'a self,
            ticket: &'a Ticket,
            _service: &'a ServiceId,
        ) -> Pin<Box<dyn Future<Output = Result<ValidationResult, ValidationError>> + Send + 'a>>
        {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = if ticket.as_str() == "ST-expired" {
                Err(ValidationError::Rejected("ticket expired".to_string()))
            } else {
                Ok(ValidationResult {
                    principal: Principal::new("alice"),
                    attributes: Attributes::new(),
                })
            };
            Box::pin(async move { outcome })
        }
    }

    struct CountingDirectory {
        calls: AtomicUsize,
    }

    impl UserDirectory for CountingDirectory {
        fn get_user<'a>(
            &'a self,
            principal: &'a Principal,
            _tenant: &'a Tenant,
        ) -> Pin<Box<dyn Future<Output = Result<UserRecord, DirectoryError>> + Send + 'a>>
        {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let user = UserRecord {
                username: principal.to_string(),
                roles: vec!["admin".to_string(), "admin".to_string()],
                permissions: vec!["read".to_string(), "write".to_string()],
                menus: vec![],
            };
            Box::pin(async move { Ok(user) })
        }
    }

    fn test_realm(ttl_seconds: u64) -> (Realm, Arc<CountingValidator>, Arc<CountingDirectory>) {
        let validator = Arc::new(CountingValidator {
            calls: AtomicUsize::new(0),
        });
        let directory = Arc::new(CountingDirectory {
            calls: AtomicUsize::new(0),
        });
        let config = RealmConfig::new("app1", "portal").with_cache_ttl_seconds(ttl_seconds);
        let authenticator = Authenticator::new(validator.clone(), directory.clone(), config);
        let realm = Realm::new(authenticator, Arc::new(MemoryIdentityCache::new()));
        (realm, validator, directory)
    }

    #[tokio::test]
    async fn test_establish_then_authorize_from_cache() {
        let (realm, validator, directory) = test_realm(3600);

        let outcome = realm
            .establish(&Ticket::new("ST-123"))
            .await
            .unwrap()
            .expect("credentials present");
        let principal = outcome.identity.principal().clone();

        // Repeated authorization checks hit neither collaborator again.
        for _ in 0..3 {
            let grant = realm.grant_for(&principal).await.expect("live identity");
            assert!(grant.has_role("admin"));
            assert!(grant.is_permitted("read"));
            // Duplicate directory roles collapse in the grant.
            assert_eq!(grant.roles.len(), 1);
        }

        assert_eq!(validator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(directory.calls.load(Ordering::SeqCst), 1);
    }

    /// Directory that canonicalizes login names to upper case.
    struct CanonicalizingDirectory;

    impl UserDirectory for CanonicalizingDirectory {
        fn get_user<'a>(
            &'a self,
            principal: &'a Principal,
            _tenant: &'a Tenant,
        ) -> Pin<Box<dyn Future<Output = Result<UserRecord, DirectoryError>> + Send + 'a>>
        {
            let user = UserRecord {
                username: principal.as_str().to_uppercase(),
                roles: vec!["admin".to_string()],
                permissions: vec![],
                menus: vec![],
            };
            Box::pin(async move { Ok(user) })
        }
    }

    #[tokio::test]
    async fn test_cache_keyed_by_validated_principal_not_directory_alias() {
        let validator = Arc::new(CountingValidator {
            calls: AtomicUsize::new(0),
        });
        let config = RealmConfig::new("app1", "portal");
        let authenticator =
            Authenticator::new(validator, Arc::new(CanonicalizingDirectory), config);
        let realm = Realm::new(authenticator, Arc::new(MemoryIdentityCache::new()));

        realm.establish(&Ticket::new("ST-123")).await.unwrap().unwrap();

        // The host holds the validated principal, not the directory alias.
        let grant = realm
            .grant_for(&Principal::new("alice"))
            .await
            .expect("cache entry lives under the validated principal");
        assert!(grant.has_role("admin"));

        let identity = realm.identity_for(&Principal::new("alice")).await.unwrap();
        assert_eq!(identity.principal().as_str(), "alice");
        assert_eq!(identity.user().username, "ALICE");

        // The alias itself is not a key.
        assert!(realm.grant_for(&Principal::new("ALICE")).await.is_none());
    }

    #[tokio::test]
    async fn test_grant_for_unknown_principal_is_none() {
        let (realm, _, _) = test_realm(3600);
        assert!(realm.grant_for(&Principal::new("nobody")).await.is_none());
    }

    #[tokio::test]
    async fn test_blank_ticket_populates_nothing() {
        let (realm, validator, _) = test_realm(3600);

        let outcome = realm.establish(&Ticket::new("")).await.unwrap();
        assert!(outcome.is_none());
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
        assert!(realm.grant_for(&Principal::new("alice")).await.is_none());
    }

    #[tokio::test]
    async fn test_failed_establish_populates_nothing() {
        let (realm, _, directory) = test_realm(3600);

        let err = realm.establish(&Ticket::new("ST-expired")).await.unwrap_err();
        assert!(matches!(err, crate::error::AuthError::TicketInvalid { .. }));
        assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
        assert!(realm.identity_for(&Principal::new("alice")).await.is_none());
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let (realm, _, _) = test_realm(3600);

        let outcome = realm
            .establish(&Ticket::new("ST-123"))
            .await
            .unwrap()
            .unwrap();
        let principal = outcome.identity.principal().clone();
        assert!(realm.grant_for(&principal).await.is_some());

        realm.logout(&principal).await;
        assert!(realm.grant_for(&principal).await.is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_caching() {
        let (realm, _, _) = test_realm(0);

        let outcome = realm
            .establish(&Ticket::new("ST-123"))
            .await
            .unwrap()
            .unwrap();
        let principal = outcome.identity.principal().clone();

        // The entry expires immediately, so every check misses.
        assert!(realm.grant_for(&principal).await.is_none());
    }

    #[tokio::test]
    async fn test_reestablish_replaces_cached_identity() {
        let (realm, validator, _) = test_realm(3600);

        realm.establish(&Ticket::new("ST-1")).await.unwrap().unwrap();
        realm.establish(&Ticket::new("ST-2")).await.unwrap().unwrap();

        // Two authentications, one live entry.
        assert_eq!(validator.calls.load(Ordering::SeqCst), 2);
        assert!(realm.grant_for(&Principal::new("alice")).await.is_some());
    }
}
