//! Identity cache boundary and in-memory implementation.
//!
//! The cache holds authenticated identities keyed by principal and service so
//! repeated authorization checks on the same session avoid re-contacting the
//! identity backend. Eviction policy and storage backend belong to the cache
//! collaborator; the realm only assumes at-most-one live entry per key and
//! that a miss triggers a fresh authentication.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::identity::AuthenticatedIdentity;
use crate::types::{Principal, ServiceId};

/// Cache key: one live identity per principal per protected service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub principal: Principal,
    pub service: ServiceId,
}

impl CacheKey {
    pub fn new(principal: impl Into<Principal>, service: impl Into<ServiceId>) -> Self {
        Self {
            principal: principal.into(),
            service: service.into(),
        }
    }
}

/// Trait for identity cache collaborators.
///
/// Backends may be remote, so all operations are async. Two concurrent
/// authentications for the same key may race to populate the cache;
/// last-write-wins is acceptable and no stronger guarantee is required.
pub trait IdentityCache: Send + Sync {
    /// Fetch the live identity for a key, if any.
    fn get<'a>(
        &'a self,
        key: &'a CacheKey,
    ) -> Pin<Box<dyn Future<Output = Option<AuthenticatedIdentity>> + Send + 'a>>;

    /// Store an identity under a key for at most `ttl`.
    fn put<'a>(
        &'a self,
        key: CacheKey,
        identity: AuthenticatedIdentity,
        ttl: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

    /// Drop the identity for a key (logout, forced re-authentication).
    fn invalidate<'a>(&'a self, key: &'a CacheKey) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Cached entry with its expiry deadline.
///
/// `None` means the configured TTL overflowed the clock and the entry
/// effectively never expires on its own.
#[derive(Clone)]
struct CachedEntry {
    identity: AuthenticatedIdentity,
    expires_at: Option<Instant>,
}

impl CachedEntry {
    fn is_live(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() < deadline,
            None => true,
        }
    }
}

/// Thread-safe in-memory identity cache with per-entry TTL.
///
/// Suitable for single-process deployments; multi-node hosts plug in their
/// own [`IdentityCache`] backend instead.
#[derive(Default)]
pub struct MemoryIdentityCache {
    entries: RwLock<HashMap<CacheKey, CachedEntry>>,
}

impl MemoryIdentityCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl IdentityCache for MemoryIdentityCache {
    fn get<'a>(
        &'a self,
        key: &'a CacheKey,
    ) -> Pin<Box<dyn Future<Output = Option<AuthenticatedIdentity>> + Send + 'a>> {
        Box::pin(async move {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live() => Some(entry.identity.clone()),
                Some(_) => {
                    debug!(principal = %key.principal, "Cached identity expired");
                    None
                }
                None => None,
            }
        })
    }

    fn put<'a>(
        &'a self,
        key: CacheKey,
        identity: AuthenticatedIdentity,
        ttl: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let entry = CachedEntry {
                identity,
                expires_at: Instant::now().checked_add(ttl),
            };
            // Last write wins on racing puts for the same key.
            self.entries.write().await.insert(key, entry);
        })
    }

    fn invalidate<'a>(&'a self, key: &'a CacheKey) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            if self.entries.write().await.remove(key).is_some() {
                debug!(principal = %key.principal, "Cached identity invalidated");
            }
        })
    }
}
