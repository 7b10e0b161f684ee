//! Error types for authentication.
//!
//! "No credentials" is deliberately not represented here: an absent or empty
//! ticket is a legitimate skip-authentication signal and surfaces as
//! `Ok(None)` from [`crate::Authenticator::authenticate`], never as an error.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Shared error cause, kept alive so the original collaborator failure
/// stays on the chain for diagnostics.
pub type ErrorSource = Arc<dyn Error + Send + Sync + 'static>;

/// Errors that can occur during authentication.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// The ticket validation service rejected the ticket (expired, forged,
    /// or already consumed).
    ///
    /// Never retried automatically: tickets are single-use, so retrying with
    /// the same ticket will always fail identically.
    TicketInvalid {
        /// The rejected ticket, for diagnostics.
        ticket: String,
        /// The validator's own failure, preserved on the cause chain.
        source: ErrorSource,
    },

    /// The validator reported success but without a usable principal name.
    ///
    /// Fatal for the request; this indicates an integration bug in the
    /// validation service, not a bad credential.
    ProtocolViolation(String),

    /// The user-profile fetch failed after a valid ticket.
    ///
    /// Safe to retry: the lookup is idempotent given the same principal.
    DirectoryLookupFailed {
        /// The principal whose profile could not be fetched.
        principal: String,
        /// The directory's own failure, preserved on the cause chain.
        source: ErrorSource,
    },

    /// A caller-imposed deadline was exceeded during an external call.
    Timeout(String),
}

impl AuthError {
    /// Wrap a validator failure, keeping the cause.
    pub fn ticket_invalid(
        ticket: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self::TicketInvalid {
            ticket: ticket.into(),
            source: Arc::new(source),
        }
    }

    /// Wrap a directory failure, keeping the cause.
    pub fn directory_lookup_failed(
        principal: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self::DirectoryLookupFailed {
            principal: principal.into(),
            source: Arc::new(source),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TicketInvalid { ticket, .. } => {
                write!(f, "Unable to validate ticket [{}]", ticket)
            }
            Self::ProtocolViolation(msg) => write!(f, "Validator protocol violation: {}", msg),
            Self::DirectoryLookupFailed { principal, .. } => {
                write!(f, "User directory lookup failed for [{}]", principal)
            }
            Self::Timeout(msg) => write!(f, "Timed out: {}", msg),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TicketInvalid { source, .. } | Self::DirectoryLookupFailed { source, .. } => {
                Some(source.as_ref())
            }
            Self::ProtocolViolation(_) | Self::Timeout(_) => None,
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Opaque collaborator failure built from a plain message.
///
/// Used by callers that only have a string to report (stub validators,
/// deserialization shims) but still want a proper cause on the chain.
#[derive(Debug, Clone)]
pub struct CollaboratorError(String);

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for CollaboratorError {}
