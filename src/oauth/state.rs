//! OAuth state management for CSRF protection.
//!
//! The `state` parameter carries the serialized [`AuthorizationState`]. A copy
//! is cached under `state:{org_id}:{user_id}` until the callback arrives; the
//! callback is only accepted when both nonces are equal.

use crate::cache::{CacheError, CacheResult, KeyValueCache};
use crate::error::{IntegrationError, IntegrationResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Bytes of entropy in each nonce
const NONCE_BYTES: usize = 32;

/// Pending authorization for one user of one organization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationState {
    #[serde(rename = "state")]
    pub nonce: String,
    pub user_id: String,
    pub org_id: String,
}

impl AuthorizationState {
    /// Create a state with a fresh random nonce
    pub fn generate(user_id: &str, org_id: &str) -> Self {
        Self {
            nonce: generate_nonce(),
            user_id: user_id.to_string(),
            org_id: org_id.to_string(),
        }
    }

    /// Serialize for the `state` query parameter and the cache
    pub fn encode(&self) -> CacheResult<String> {
        serde_json::to_string(self).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    /// Parse a `state` value received on the callback
    pub fn decode(raw: &str) -> IntegrationResult<Self> {
        serde_json::from_str(raw).map_err(|e| IntegrationError::MalformedState(e.to_string()))
    }

    pub fn cache_key(&self) -> String {
        state_key(&self.org_id, &self.user_id)
    }
}

/// Cache key of the pending state for a user
pub fn state_key(org_id: &str, user_id: &str) -> String {
    format!("state:{}:{}", org_id, user_id)
}

/// URL-safe base64 of [`NONCE_BYTES`] bytes from the OS-seeded thread RNG
fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Issues, verifies and consumes authorization states stored in the cache.
#[derive(Clone)]
pub struct StateManager {
    cache: Arc<dyn KeyValueCache>,
    ttl: Duration,
}

impl StateManager {
    pub fn new(cache: Arc<dyn KeyValueCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Generate a new state and store it, replacing any pending one for the same user
    pub async fn create_state(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> IntegrationResult<AuthorizationState> {
        let state = AuthorizationState::generate(user_id, org_id);
        let encoded = state.encode()?;
        self.cache
            .set(&state.cache_key(), &encoded, Some(self.ttl))
            .await?;
        Ok(state)
    }

    /// Check the presented state against the cached one without consuming it.
    ///
    /// Fails with `StateMismatch` when nothing is cached (never issued, already
    /// consumed or expired), when the cached value is unreadable, or when the
    /// nonces differ.
    pub async fn verify(&self, presented: &AuthorizationState) -> IntegrationResult<()> {
        let saved = self
            .cache
            .get(&presented.cache_key())
            .await?
            .ok_or(IntegrationError::StateMismatch)?;

        let saved = AuthorizationState::decode(&saved).map_err(|e| {
            tracing::warn!(error = %e, "Cached OAuth state is unreadable");
            IntegrationError::StateMismatch
        })?;

        if saved.nonce != presented.nonce {
            return Err(IntegrationError::StateMismatch);
        }

        Ok(())
    }

    /// Atomically remove the cached state (single-use).
    ///
    /// Only one of several concurrent claims for the same pending state
    /// succeeds; the others fail with `StateMismatch`.
    pub async fn claim(&self, presented: &AuthorizationState) -> IntegrationResult<()> {
        let taken = self
            .cache
            .take(&presented.cache_key())
            .await?
            .ok_or(IntegrationError::StateMismatch)?;

        match AuthorizationState::decode(&taken) {
            Ok(saved) if saved.nonce == presented.nonce => Ok(()),
            _ => Err(IntegrationError::StateMismatch),
        }
    }
}
