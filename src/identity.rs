//! Identity model: directory user records and the cached identity bundle.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Principal;

/// Untyped attribute map returned by the ticket validation service.
///
/// Keys are attribute names; values are whatever the validator asserted
/// (strings in practice, but the protocol does not promise that).
pub type Attributes = HashMap<String, serde_json::Value>;

/// User profile fetched from the user directory.
///
/// The directory may omit any of the collections; an omitted or empty list
/// is a valid profile, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Login name, matching the validated principal.
    pub username: String,
    /// Roles granted to this user, in directory order. May contain duplicates.
    #[serde(default)]
    pub roles: Vec<String>,
    /// String-form permissions granted to this user, in directory order.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Navigation menu entries for this user. Opaque to the realm core.
    #[serde(default)]
    pub menus: Vec<Menu>,
}

impl UserRecord {
    /// Create a record with just a username and no grants.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            roles: Vec::new(),
            permissions: Vec::new(),
            menus: Vec::new(),
        }
    }
}

/// A navigation menu entry, carried through from the directory untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Child entries for nested menus.
    #[serde(default)]
    pub items: Vec<Menu>,
}

/// The durable artifact of a successful authentication.
///
/// Composed of the directory user record plus the raw attributes asserted by
/// the validator. This pair, not the ticket, is what gets cached and later
/// handed to the authorization engine. Immutable once constructed: a change
/// in underlying roles or permissions requires re-authentication or explicit
/// cache invalidation, never in-place mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    principal: Principal,
    user: UserRecord,
    attributes: Attributes,
}

impl AuthenticatedIdentity {
    /// Bind the validated principal and directory record to the attributes
    /// captured at validation time.
    pub fn new(
        principal: impl Into<Principal>,
        user: UserRecord,
        attributes: Attributes,
    ) -> Self {
        Self {
            principal: principal.into(),
            user,
            attributes,
        }
    }

    /// The principal this identity was established for, exactly as asserted
    /// by the ticket validator.
    ///
    /// This is the cache key half; the directory is free to canonicalize or
    /// alias the login name in [`UserRecord::username`] without affecting it.
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// The directory user record captured at authentication time.
    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    /// The raw attributes asserted by the ticket validator.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Look up a single attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }
}

/// What a successful `authenticate` call hands back: the identity to cache
/// plus the remember-me session hint derived from the validator attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Authenticated {
    /// The identity bundle, ready for the identity cache.
    pub identity: AuthenticatedIdentity,
    /// Session-duration hint; policy around it lives outside this crate.
    pub remember_me: bool,
}
