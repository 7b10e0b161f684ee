//! User directory boundary.
//!
//! The user directory is an external collaborator: given a validated
//! principal name and a tenant identifier it returns the user's profile with
//! roles, permissions, and menus. This module defines the interface the
//! realm consumes and a thin REST client for directories exposed over
//! HTTP/JSON.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::identity::UserRecord;
use crate::types::{Principal, Tenant};

/// Default request timeout for the REST directory client.
pub const DEFAULT_LOOKUP_TIMEOUT_SECONDS: u64 = 10;

/// Errors reported by a user directory.
#[derive(Debug, Clone)]
pub enum DirectoryError {
    /// No profile exists for the principal in the given tenant.
    NotFound(String),
    /// The directory service could not be reached.
    Unavailable(String),
    /// The directory answered with an unparseable response.
    Malformed(String),
    /// The lookup exceeded its deadline.
    Timeout(String),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "User not found: {}", name),
            Self::Unavailable(msg) => write!(f, "User directory unavailable: {}", msg),
            Self::Malformed(msg) => write!(f, "Malformed directory response: {}", msg),
            Self::Timeout(msg) => write!(f, "Directory lookup timed out: {}", msg),
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Trait for user directory collaborators.
///
/// Lookups are idempotent: retrying with the same principal and tenant is
/// always safe. The boxed future keeps the trait dyn-compatible.
pub trait UserDirectory: Send + Sync {
    /// Fetch the profile for a principal within a tenant.
    fn get_user<'a>(
        &'a self,
        principal: &'a Principal,
        tenant: &'a Tenant,
    ) -> Pin<Box<dyn Future<Output = Result<UserRecord, DirectoryError>> + Send + 'a>>;
}

/// REST client for directories that answer HTTP/JSON.
///
/// Sends `GET {base}/users/{principal}?tenant={tenant}` and expects a
/// [`UserRecord`]-shaped document back.
pub struct RestUserDirectory {
    base: Url,
    client: reqwest::Client,
}

impl RestUserDirectory {
    /// Create a client for the given directory base URL with the default
    /// request timeout.
    pub fn new(base: &str) -> anyhow::Result<Self> {
        Self::with_timeout(base, Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECONDS))
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base = Url::parse(base)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base, client })
    }

    /// The configured directory base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn user_url(&self, principal: &Principal, tenant: &Tenant) -> Result<Url, DirectoryError> {
        let mut url = self
            .base
            .join(&format!("users/{}", principal.as_str()))
            .map_err(|e| DirectoryError::Malformed(e.to_string()))?;
        url.query_pairs_mut().append_pair("tenant", tenant.as_str());
        Ok(url)
    }

    async fn get_user_inner(
        &self,
        principal: &Principal,
        tenant: &Tenant,
    ) -> Result<UserRecord, DirectoryError> {
        let url = self.user_url(principal, tenant)?;
        debug!(principal = %principal, tenant = %tenant, "Fetching user profile");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DirectoryError::Timeout(e.to_string())
            } else {
                DirectoryError::Unavailable(e.to_string())
            }
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DirectoryError::NotFound(principal.to_string()));
        }

        if !response.status().is_success() {
            return Err(DirectoryError::Unavailable(format!(
                "HTTP {} from user directory",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DirectoryError::Malformed(e.to_string()))
    }
}

impl UserDirectory for RestUserDirectory {
    fn get_user<'a>(
        &'a self,
        principal: &'a Principal,
        tenant: &'a Tenant,
    ) -> Pin<Box<dyn Future<Output = Result<UserRecord, DirectoryError>> + Send + 'a>> {
        Box::pin(self.get_user_inner(principal, tenant))
    }
}
