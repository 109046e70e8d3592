//! Error taxonomy shared by the OAuth controller and the item fetchers.

use crate::cache::CacheError;
use thiserror::Error;

/// Failures surfaced by the integration flow.
///
/// Every variant is distinguishable by the caller. Per-endpoint non-200
/// responses during an item fetch are not errors and never reach this type.
#[derive(Error, Debug)]
pub enum IntegrationError {
    /// The provider reported an error, either on the authorization callback
    /// or as a non-success token endpoint response.
    #[error("{0}")]
    Provider(String),

    /// The `state` parameter is missing or is not a serialized authorization state.
    #[error("Malformed state parameter: {0}")]
    MalformedState(String),

    /// No pending authorization for this user, or its nonce differs.
    #[error("State does not match.")]
    StateMismatch,

    /// Credentials were never stored, already retrieved, or expired.
    #[error("No credentials found.")]
    NoCredentials,

    #[error("No access token found in credentials.")]
    MissingToken,

    #[error("Missing '{0}' parameter")]
    MissingParameter(&'static str),

    /// Supplied credentials are not a JSON object.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Transport failure while fetching items.
    #[error("Error fetching {provider} data: {source:#}")]
    Fetch {
        provider: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Transport failure or unreadable body from the token endpoint.
    #[error("Token exchange failed: {0:#}")]
    TokenExchange(#[source] anyhow::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub type IntegrationResult<T> = Result<T, IntegrationError>;
