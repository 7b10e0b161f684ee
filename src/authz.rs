//! Authorization engine.
//!
//! Derives role and permission grants from an already-authenticated identity.
//! Deliberately pure: no network, no directory calls, no clock. Repeated
//! access checks on an authenticated session stay cheap because everything
//! needed was captured at authentication time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::identity::AuthenticatedIdentity;

/// The derived set of roles and permissions for an identity.
///
/// An ephemeral view: recomputed per authorization query and never persisted
/// independently of the identity it was projected from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthorizationGrant {
    /// Granted roles. Duplicates from the directory record collapse.
    pub roles: HashSet<String>,
    /// Granted string-form permissions, likewise deduplicated.
    pub permissions: HashSet<String>,
}

impl AuthorizationGrant {
    /// Whether this grant carries any role or permission at all.
    ///
    /// A user with no roles is valid and simply has no elevated access.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty()
    }

    /// Whether the given role was granted.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Whether the given permission was granted.
    pub fn is_permitted(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// The authorization engine.
///
/// Stateless; a single instance is safe to share across concurrent
/// authorization checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authorizer;

impl Authorizer {
    /// Create an engine.
    pub fn new() -> Self {
        Self
    }

    /// Project an identity into its grant.
    ///
    /// Purely a copy into sets: deterministic for the same identity, empty
    /// role or permission lists yield an empty grant rather than an error.
    /// The caller is trusted to have retrieved the identity from the
    /// identity cache rather than re-deriving it from raw input.
    pub fn authorize(&self, identity: &AuthenticatedIdentity) -> AuthorizationGrant {
        let grant = AuthorizationGrant {
            roles: identity.user().roles.iter().cloned().collect(),
            permissions: identity.user().permissions.iter().cloned().collect(),
        };

        debug!(
            principal = %identity.principal(),
            roles = grant.roles.len(),
            permissions = grant.permissions.len(),
            "Authorization grant derived"
        );

        grant
    }
}
