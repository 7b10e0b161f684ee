//! Ticket validation boundary.
//!
//! The ticket validation service is an external collaborator: given an opaque
//! ticket and the identifier of the protected service, it either asserts a
//! principal plus a set of attributes or rejects the ticket. The wire
//! protocol is the identity backend's own business; this module defines the
//! narrow interface the realm consumes and a thin REST client for backends
//! that expose validation over HTTP/JSON.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::identity::Attributes;
use crate::types::{Principal, ServiceId, Ticket};

/// Default request timeout for the REST validator client.
pub const DEFAULT_VALIDATE_TIMEOUT_SECONDS: u64 = 10;

/// What a successful validation asserts: the principal plus its attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationResult {
    /// The validated principal name.
    pub principal: Principal,
    /// Attributes asserted alongside the principal. Values are untyped.
    #[serde(default)]
    pub attributes: Attributes,
}

/// Errors reported by a ticket validator.
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// The validator rejected the ticket (malformed, expired, or unknown).
    Rejected(String),
    /// The validation service could not be reached.
    Unavailable(String),
    /// The validation service answered with an unparseable response.
    Malformed(String),
    /// The validation call exceeded its deadline.
    Timeout(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(msg) => write!(f, "Ticket rejected: {}", msg),
            Self::Unavailable(msg) => write!(f, "Validation service unavailable: {}", msg),
            Self::Malformed(msg) => write!(f, "Malformed validation response: {}", msg),
            Self::Timeout(msg) => write!(f, "Validation timed out: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trait for ticket validation collaborators.
///
/// Implementations are shared across request tasks, so they take `&self` and
/// must be `Send + Sync`. The boxed future keeps the trait dyn-compatible.
pub trait TicketValidator: Send + Sync {
    /// Validate a ticket on behalf of the given protected service.
    fn validate<'a>(
        &'a self,
        ticket: &'a Ticket,
        service: &'a ServiceId,
    ) -> Pin<Box<dyn Future<Output = Result<ValidationResult, ValidationError>> + Send + 'a>>;
}

/// REST client for validation services that answer HTTP/JSON.
///
/// Sends `POST {endpoint}` with a `{"ticket": ..., "service": ...}` body and
/// expects a [`ValidationResult`]-shaped document back. Any non-success
/// status is treated as a rejection.
pub struct RestTicketValidator {
    endpoint: Url,
    client: reqwest::Client,
}

impl RestTicketValidator {
    /// Create a client for the given validation endpoint with the default
    /// request timeout.
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_VALIDATE_TIMEOUT_SECONDS))
    }

    /// Create a client with an explicit request timeout.
    ///
    /// The timeout is the caller-imposed deadline for the whole validation
    /// call; exceeding it surfaces as [`ValidationError::Timeout`].
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    /// The configured validation endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn validate_inner(
        &self,
        ticket: &Ticket,
        service: &ServiceId,
    ) -> Result<ValidationResult, ValidationError> {
        debug!(endpoint = %self.endpoint, service = %service, "Validating ticket");

        let body = serde_json::json!({
            "ticket": ticket.as_str(),
            "service": service.as_str(),
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ValidationError::Timeout(e.to_string())
                } else {
                    ValidationError::Unavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ValidationError::Rejected(format!(
                "HTTP {} from validation endpoint",
                response.status()
            )));
        }

        let result: ValidationResult = response
            .json()
            .await
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;

        debug!(principal = %result.principal, "Ticket validated");
        Ok(result)
    }
}

impl TicketValidator for RestTicketValidator {
    fn validate<'a>(
        &'a self,
        ticket: &'a Ticket,
        service: &'a ServiceId,
    ) -> Pin<Box<dyn Future<Output = Result<ValidationResult, ValidationError>> + Send + 'a>> {
        Box::pin(self.validate_inner(ticket, service))
    }
}
