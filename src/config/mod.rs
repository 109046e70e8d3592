use serde::Deserialize;
use std::time::Duration;

/// Complete bridge configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub hubspot: HubSpotConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// HubSpot OAuth application and endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HubSpotConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    /// Space separated OAuth scopes
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// REST API base for the CRM object endpoints
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Web app base used to build item links
    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,
    #[serde(default = "default_ttl_seconds")]
    pub state_ttl_seconds: u64,
    #[serde(default = "default_ttl_seconds")]
    pub credentials_ttl_seconds: u64,
}

fn default_redirect_uri() -> String {
    "http://localhost:8000/integrations/hubspot/oauth2callback".to_string()
}

fn default_scope() -> String {
    "contacts oauth".to_string()
}

fn default_auth_url() -> String {
    "https://app.hubspot.com/oauth/authorize".to_string()
}

fn default_token_url() -> String {
    "https://api.hubapi.com/oauth/v1/token".to_string()
}

fn default_api_base_url() -> String {
    "https://api.hubapi.com".to_string()
}

fn default_app_base_url() -> String {
    "https://app.hubspot.com".to_string()
}

fn default_ttl_seconds() -> u64 {
    600
}

impl Default for HubSpotConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            scope: default_scope(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
            app_base_url: default_app_base_url(),
            state_ttl_seconds: default_ttl_seconds(),
            credentials_ttl_seconds: default_ttl_seconds(),
        }
    }
}

impl HubSpotConfig {
    pub fn state_ttl(&self) -> Duration {
        Duration::from_secs(self.state_ttl_seconds)
    }

    pub fn credentials_ttl(&self) -> Duration {
        Duration::from_secs(self.credentials_ttl_seconds)
    }
}

/// Cache backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// "redis" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default)]
    pub key_prefix: String,
    /// Use the in-memory backend when Redis cannot be reached at startup
    #[serde(default = "default_fallback_to_memory")]
    pub fallback_to_memory: bool,
    /// Sweep interval for expired in-memory entries
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

fn default_backend() -> String {
    "redis".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379/0".to_string()
}

fn default_fallback_to_memory() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            redis_url: default_redis_url(),
            key_prefix: String::new(),
            fallback_to_memory: default_fallback_to_memory(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Frontend origin allowed by CORS
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

impl BridgeConfig {
    /// Apply `CRM_BRIDGE_*` environment overrides on top of this config.
    ///
    /// `REDIS_HOST` is honored for compatibility and expands to
    /// `redis://{host}:6379/0` unless `CRM_BRIDGE_REDIS_URL` is also set.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok());
        self
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CRM_BRIDGE_HUBSPOT_CLIENT_ID") {
            self.hubspot.client_id = v;
        }
        if let Some(v) = lookup("CRM_BRIDGE_HUBSPOT_CLIENT_SECRET") {
            self.hubspot.client_secret = v;
        }
        if let Some(v) = lookup("CRM_BRIDGE_HUBSPOT_REDIRECT_URI") {
            self.hubspot.redirect_uri = v;
        }
        if let Some(v) = lookup("CRM_BRIDGE_HUBSPOT_SCOPE") {
            self.hubspot.scope = v;
        }
        if let Some(v) = lookup("CRM_BRIDGE_CACHE_BACKEND") {
            self.cache.backend = v;
        }
        if let Some(host) = lookup("REDIS_HOST") {
            self.cache.redis_url = format!("redis://{}:6379/0", host);
        }
        if let Some(v) = lookup("CRM_BRIDGE_REDIS_URL") {
            self.cache.redis_url = v;
        }
        if let Some(v) = lookup("CRM_BRIDGE_BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = lookup("CRM_BRIDGE_ALLOWED_ORIGIN") {
            self.server.allowed_origin = v;
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> anyhow::Result<BridgeConfig> {
    use anyhow::Context;

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: BridgeConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path))?;
    Ok(config)
}
