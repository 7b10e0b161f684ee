//! NewType wrappers for strong typing throughout the realm.
//!
//! These types prevent accidental mixing of semantically different strings
//! (e.g., passing a tenant identifier where a service identifier is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    /// Opaque single-use credential issued by the SSO ticket service after a
    /// successful login (e.g., "ST-123-abcdef").
    ///
    /// A ticket is consumed exactly once per validation attempt and is never
    /// persisted. After authentication completes the ticket is discarded;
    /// the cached identity takes its place.
    Ticket
);

impl Ticket {
    /// Whether the ticket carries any credential at all.
    ///
    /// An empty or whitespace-only ticket is the "nothing to authenticate"
    /// case, not a malformed credential.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

newtype_string!(
    /// Identifier of the protected service requesting ticket validation.
    ///
    /// Analogous to an OAuth client id or a CAS service URL. Configured once
    /// at startup and immutable for the lifetime of the realm.
    ServiceId
);

newtype_string!(
    /// The authenticated identity's unique name, as asserted by the ticket
    /// validation service.
    ///
    /// A successful validation always carries a non-empty principal; an
    /// empty one is treated as a protocol violation by the validator.
    Principal
);

newtype_string!(
    /// Logical partition identifier distinguishing which backend server or
    /// application a principal's profile belongs to.
    ///
    /// Passed to the user directory alongside the principal name so the same
    /// login can resolve to different role sets per deployment.
    Tenant
);
