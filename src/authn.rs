//! Authentication engine.
//!
//! Orchestrates ticket validation and the user-profile fetch, producing the
//! identity bundle that downstream code caches and authorizes against. The
//! engine holds no mutable state: the injected collaborators are initialized
//! once and shared read-only across concurrent requests.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::RealmConfig;
use crate::directory::{DirectoryError, UserDirectory};
use crate::error::{AuthError, AuthResult};
use crate::identity::{Authenticated, AuthenticatedIdentity};
use crate::types::Ticket;
use crate::validator::{TicketValidator, ValidationError};

/// The authentication engine.
///
/// Validates a single-use ticket against the ticket validation service,
/// enriches the asserted principal with the user directory profile, and
/// returns the resulting [`Authenticated`] bundle. The ticket itself is
/// discarded after the call; only the identity survives.
pub struct Authenticator {
    validator: Arc<dyn TicketValidator>,
    directory: Arc<dyn UserDirectory>,
    config: RealmConfig,
}

impl Authenticator {
    /// Create an engine around the injected collaborators.
    pub fn new(
        validator: Arc<dyn TicketValidator>,
        directory: Arc<dyn UserDirectory>,
        config: RealmConfig,
    ) -> Self {
        Self {
            validator,
            directory,
            config,
        }
    }

    /// The realm configuration this engine was built with.
    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    /// Authenticate a ticket.
    ///
    /// Returns `Ok(None)` when the ticket is empty or blank: that is the
    /// legitimate "nothing to authenticate" case, distinguished from a hard
    /// failure, and neither collaborator is contacted for it.
    ///
    /// On success the returned identity's attributes are exactly what the
    /// validator asserted, and the remember-me hint reflects the configured
    /// attribute (a string value parsing case-insensitively as `true`).
    pub async fn authenticate(&self, ticket: &Ticket) -> AuthResult<Option<Authenticated>> {
        if ticket.is_blank() {
            debug!("No credentials presented, skipping authentication");
            return Ok(None);
        }

        let result = self
            .validator
            .validate(ticket, &self.config.service)
            .await
            .map_err(|e| {
                warn!(service = %self.config.service, error = %e, "Ticket validation failed");
                match e {
                    ValidationError::Timeout(msg) => AuthError::Timeout(msg),
                    // An unparseable success response is the validator
                    // breaking its protocol, not a bad credential.
                    ValidationError::Malformed(msg) => AuthError::ProtocolViolation(msg),
                    other => AuthError::ticket_invalid(ticket.as_str(), other),
                }
            })?;

        if result.principal.as_str().trim().is_empty() {
            warn!(service = %self.config.service, "Validator asserted an empty principal");
            return Err(AuthError::ProtocolViolation(
                "validation succeeded without a principal name".to_string(),
            ));
        }

        let remember_me = result
            .attributes
            .get(&self.config.remember_me_attribute)
            .and_then(|v| v.as_str())
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let principal = result.principal.clone();
        let user = self
            .directory
            .get_user(&principal, &self.config.tenant)
            .await
            .map_err(|e| {
                warn!(principal = %principal, error = %e, "User directory lookup failed");
                match e {
                    DirectoryError::Timeout(msg) => AuthError::Timeout(msg),
                    other => AuthError::directory_lookup_failed(principal.as_str(), other),
                }
            })?;

        info!(principal = %principal, remember_me, "Authentication succeeded");

        Ok(Some(Authenticated {
            identity: AuthenticatedIdentity::new(principal, user, result.attributes),
            remember_me,
        }))
    }
}
