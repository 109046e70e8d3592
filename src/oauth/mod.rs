//! OAuth 2.0 authorization flow for the HubSpot integration.
//!
//! Implements the authorization code flow:
//! 1. `authorize` caches a CSRF state and returns the provider URL
//! 2. User authorizes on the provider's site (in a popup)
//! 3. Provider redirects to the callback with `code` and `state`
//! 4. `handle_callback` checks the state, exchanges the code and caches the
//!    token response for a short time
//! 5. `retrieve_credentials` hands the token response out once

mod exchange;
mod provider;
mod state;

pub use exchange::exchange_code_for_token;
pub use provider::OAuthProviderConfig;
pub use state::{state_key, AuthorizationState, StateManager};

use crate::cache::{CacheError, KeyValueCache};
use crate::config::HubSpotConfig;
use crate::credentials::Credentials;
use crate::error::{IntegrationError, IntegrationResult};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cache key of the unclaimed credentials for a user
pub fn credentials_key(org_id: &str, user_id: &str) -> String {
    format!("credentials:{}:{}", org_id, user_id)
}

/// OAuth callback query parameters
#[derive(Debug, Default, Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// User whose authorization completed on the callback
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizedUser {
    pub user_id: String,
    pub org_id: String,
}

/// Authorize → callback → credential retrieval controller.
///
/// Stateless apart from the injected cache; clones share it.
#[derive(Clone)]
pub struct OAuthFlow {
    provider: OAuthProviderConfig,
    states: StateManager,
    cache: Arc<dyn KeyValueCache>,
    http_client: reqwest::Client,
    credentials_ttl: Duration,
}

impl OAuthFlow {
    pub fn new(config: &HubSpotConfig, cache: Arc<dyn KeyValueCache>) -> Self {
        Self {
            provider: OAuthProviderConfig::from(config),
            states: StateManager::new(Arc::clone(&cache), config.state_ttl()),
            cache,
            http_client: reqwest::Client::new(),
            credentials_ttl: config.credentials_ttl(),
        }
    }

    /// Start an authorization and return the provider URL to open.
    pub async fn authorize(&self, user_id: &str, org_id: &str) -> IntegrationResult<String> {
        let state = self.states.create_state(user_id, org_id).await?;
        let url = self.provider.build_auth_url(&state.encode()?);

        info!(user_id = %user_id, org_id = %org_id, "OAuth authorization started");
        Ok(url)
    }

    /// Validate the provider callback, exchange the code and cache the tokens.
    ///
    /// The cached state is claimed alongside the token exchange, whether or not
    /// the exchange succeeds. When concurrent callbacks present the same state
    /// only the one that claims it stores credentials.
    pub async fn handle_callback(
        &self,
        callback: &OAuthCallback,
    ) -> IntegrationResult<AuthorizedUser> {
        // An empty `error=` reads as absent
        if let Some(error) = callback.error.as_deref().filter(|e| !e.is_empty()) {
            warn!(
                error = %error,
                description = callback.error_description.as_deref().unwrap_or(""),
                "OAuth authorization failed at provider"
            );
            return Err(IntegrationError::Provider(error.to_string()));
        }

        let raw_state = callback.state.as_deref().ok_or_else(|| {
            IntegrationError::MalformedState("missing 'state' parameter".to_string())
        })?;
        let presented = AuthorizationState::decode(raw_state)?;
        let code = callback
            .code
            .as_deref()
            .ok_or(IntegrationError::MissingParameter("code"))?;

        if let Err(e) = self.states.verify(&presented).await {
            warn!(
                user_id = %presented.user_id,
                org_id = %presented.org_id,
                "Invalid or expired OAuth state"
            );
            return Err(e);
        }

        debug!(
            user_id = %presented.user_id,
            org_id = %presented.org_id,
            "CSRF state validated, exchanging code"
        );

        // join! polls both to completion; the claim is never cancelled by an
        // exchange failure
        let (exchange, claimed) = tokio::join!(
            exchange_code_for_token(
                &self.http_client,
                &self.provider.token_url,
                code,
                &self.provider.redirect_uri,
                &self.provider.client_id,
                &self.provider.client_secret,
            ),
            self.states.claim(&presented),
        );

        if let Err(e) = claimed {
            warn!(
                user_id = %presented.user_id,
                org_id = %presented.org_id,
                "OAuth state already claimed by another callback"
            );
            return Err(e);
        }
        let credentials = exchange.map_err(|e| {
            warn!(
                user_id = %presented.user_id,
                org_id = %presented.org_id,
                error = %e,
                "Token exchange failed"
            );
            e
        })?;

        let encoded = serde_json::to_string(&credentials)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.cache
            .set(
                &credentials_key(&presented.org_id, &presented.user_id),
                &encoded,
                Some(self.credentials_ttl),
            )
            .await?;

        info!(
            user_id = %presented.user_id,
            org_id = %presented.org_id,
            has_refresh_token = credentials.refresh_token().is_some(),
            "OAuth flow completed"
        );

        Ok(AuthorizedUser {
            user_id: presented.user_id,
            org_id: presented.org_id,
        })
    }

    /// Hand out the cached credentials once, then forget them.
    ///
    /// The entry is taken atomically, so concurrent calls never both succeed.
    /// An entry holding no credentials is discarded.
    pub async fn retrieve_credentials(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> IntegrationResult<Credentials> {
        let key = credentials_key(org_id, user_id);

        let raw = self
            .cache
            .take(&key)
            .await?
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(IntegrationError::NoCredentials)?;

        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        let credentials = match value {
            Value::Object(fields) if !fields.is_empty() => Credentials::new(fields),
            _ => return Err(IntegrationError::NoCredentials),
        };

        debug!(user_id = %user_id, org_id = %org_id, "Credentials retrieved");
        Ok(credentials)
    }
}
