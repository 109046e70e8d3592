use async_trait::async_trait;
use crm_bridge::{Credentials, IntegrationItem, IntegrationResult};

/// Connector interface for CRM integrations.
///
/// Connectors are stateless - credentials are obtained through the OAuth
/// flow and handed in on every call.
///
/// # Lifecycle
/// 1. User authorizes via the OAuth flow (popup)
/// 2. Frontend claims the credentials once
/// 3. Frontend asks for items with those credentials
/// 4. Connector returns normalized items
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the unique identifier for this connector.
    ///
    /// Lowercase (e.g., "hubspot"). Used for routes and logging.
    fn name(&self) -> &str;

    /// Fetches records from the external API and normalizes them.
    ///
    /// # Returns
    /// * `Ok(Vec<IntegrationItem>)` - Items from every endpoint that answered
    /// * `Err(MissingToken)` - Credentials carry no access token
    /// * `Err(Fetch)` - A request could not be completed
    async fn fetch(&self, credentials: &Credentials) -> IntegrationResult<Vec<IntegrationItem>>;
}
