// Ephemeral key/value cache (memory or redis)
pub mod cache;

// Configuration (TOML + environment)
pub mod config;

// Error taxonomy
pub mod error;

// Provider token responses
pub mod credentials;

// Normalized integration items
pub mod item;

// OAuth authorization flow
pub mod oauth;

// HTTP API
pub mod api;

pub use credentials::Credentials;
pub use error::{IntegrationError, IntegrationResult};
pub use item::{IntegrationItem, ItemType};
