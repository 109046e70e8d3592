//! OAuth provider configuration.

use crate::config::HubSpotConfig;

/// OAuth application registered with a provider
#[derive(Clone, Debug)]
pub struct OAuthProviderConfig {
    /// OAuth authorization endpoint URL
    pub auth_url: String,

    /// OAuth token exchange endpoint URL
    pub token_url: String,

    /// Space separated scopes
    pub scope: String,

    pub client_id: String,

    pub client_secret: String,

    /// Callback URL registered with the provider
    pub redirect_uri: String,
}

impl OAuthProviderConfig {
    /// Build authorization URL carrying the serialized state
    pub fn build_auth_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.scope),
            urlencoding::encode(state)
        )
    }
}

impl From<&HubSpotConfig> for OAuthProviderConfig {
    fn from(config: &HubSpotConfig) -> Self {
        Self {
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            scope: config.scope.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }
}
