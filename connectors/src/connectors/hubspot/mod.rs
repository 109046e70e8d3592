pub mod api;
pub mod config;
pub mod transformer;

use crate::Connector;
use async_trait::async_trait;
use crm_bridge::config::HubSpotConfig;
use crm_bridge::{Credentials, IntegrationError, IntegrationItem, IntegrationResult};

use self::api::HubSpotClient;
use self::config::CrmObject;
use self::transformer::record_to_item;

/// HubSpot connector. Reads contacts, companies and deals and returns them
/// as normalized items.
pub struct HubSpotConnector {
    api_base_url: String,
    app_base_url: String,
    http_client: reqwest::Client,
}

impl HubSpotConnector {
    /// Create a connector using the default HubSpot URLs.
    pub fn new() -> Self {
        Self::from_config(&HubSpotConfig::default())
    }

    /// Create a connector with custom API and web app base URLs (for testing).
    pub fn with_base_urls(api_base_url: String, app_base_url: String) -> Self {
        Self {
            api_base_url,
            app_base_url,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &HubSpotConfig) -> Self {
        Self::with_base_urls(config.api_base_url.clone(), config.app_base_url.clone())
    }
}

impl Default for HubSpotConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for HubSpotConnector {
    fn name(&self) -> &str {
        "hubspot"
    }

    async fn fetch(&self, credentials: &Credentials) -> IntegrationResult<Vec<IntegrationItem>> {
        let access_token = credentials
            .access_token()
            .ok_or(IntegrationError::MissingToken)?;

        let client = HubSpotClient::new(
            self.http_client.clone(),
            access_token.to_string(),
            self.api_base_url.clone(),
        );

        // The first transport failure aborts the whole fetch
        let (contacts, companies, deals) = tokio::try_join!(
            client.fetch_objects(CrmObject::Contacts),
            client.fetch_objects(CrmObject::Companies),
            client.fetch_objects(CrmObject::Deals),
        )
        .map_err(|e| IntegrationError::Fetch {
            provider: "HubSpot",
            source: e,
        })?;

        let mut items = Vec::new();
        for (object, records) in CrmObject::ALL.into_iter().zip([contacts, companies, deals]) {
            for record in records.iter().flatten() {
                items.push(record_to_item(object, record, &self.app_base_url));
            }
        }

        tracing::debug!(count = items.len(), "HubSpot integration items fetched");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn credentials(json: serde_json::Value) -> Credentials {
        Credentials::try_from(json).unwrap()
    }

    #[test]
    fn test_connector_metadata() {
        let connector = HubSpotConnector::new();
        assert_eq!(connector.name(), "hubspot");
        assert_eq!(connector.api_base_url, "https://api.hubapi.com");
        assert_eq!(connector.app_base_url, "https://app.hubspot.com");
    }

    #[test]
    fn test_from_config_uses_configured_urls() {
        let config = HubSpotConfig {
            api_base_url: "http://api.local".to_string(),
            app_base_url: "http://app.local".to_string(),
            ..HubSpotConfig::default()
        };
        let connector = HubSpotConnector::from_config(&config);
        assert_eq!(connector.api_base_url, "http://api.local");
        assert_eq!(connector.app_base_url, "http://app.local");
    }

    #[tokio::test]
    async fn test_fetch_returns_items_in_collection_order() {
        let mut server = Server::new_async().await;

        let _contacts = server
            .mock("GET", "/crm/v3/objects/contacts")
            .match_query(Matcher::UrlEncoded("limit".into(), "100".into()))
            .match_header("authorization", "Bearer test_token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results":[
                    {"id":"1","properties":{"firstname":"A","lastname":"B"},"createdAt":"t1","updatedAt":"t2"},
                    {"id":"2","properties":{"firstname":"C","lastname":"D"},"createdAt":"t3","updatedAt":"t4"}
                ]}"#,
            )
            .create_async()
            .await;

        let _companies = server
            .mock("GET", "/crm/v3/objects/companies")
            .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results":[{"id":"10","properties":{"name":"Acme"}}]}"#)
            .create_async()
            .await;

        let _deals = server
            .mock("GET", "/crm/v3/objects/deals")
            .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results":[{"id":"20","properties":{}}]}"#)
            .create_async()
            .await;

        let connector = HubSpotConnector::with_base_urls(server.url(), "https://app.test".to_string());
        let items = connector
            .fetch(&credentials(serde_json::json!({"access_token": "test_token"})))
            .await
            .unwrap();

        let summary: Vec<(Option<&str>, &str)> = items
            .iter()
            .map(|i| (i.id.as_deref(), i.name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some("1"), "A B"),
                (Some("2"), "C D"),
                (Some("10"), "Acme"),
                (Some("20"), "Unnamed Deal"),
            ]
        );
        assert_eq!(items[2].url.as_deref(), Some("https://app.test/contacts/10"));
    }

    #[tokio::test]
    async fn test_failing_collection_is_skipped() {
        let mut server = Server::new_async().await;

        let _contacts = server
            .mock("GET", "/crm/v3/objects/contacts")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results":[{"id":"1","properties":{"firstname":"A","lastname":"B"}}]}"#)
            .create_async()
            .await;

        let _companies = server
            .mock("GET", "/crm/v3/objects/companies")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let _deals = server
            .mock("GET", "/crm/v3/objects/deals")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results":[{"id":"20","properties":{"dealname":"Renewal"}}]}"#)
            .create_async()
            .await;

        let connector = HubSpotConnector::with_base_urls(server.url(), "https://app.test".to_string());
        let items = connector
            .fetch(&credentials(serde_json::json!({"access_token": "t"})))
            .await
            .unwrap();

        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["A B", "Renewal"]);
        assert_eq!(items[1].item_type, crm_bridge::ItemType::Deal);
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_requests() {
        let mut server = Server::new_async().await;
        let any_request = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let connector = HubSpotConnector::with_base_urls(server.url(), "https://app.test".to_string());
        let err = connector
            .fetch(&credentials(serde_json::json!({"refresh_token": "rt"})))
            .await
            .unwrap_err();

        assert!(matches!(err, IntegrationError::MissingToken));
        any_request.assert_async().await;
    }

    #[tokio::test]
    async fn test_transport_failure_is_fetch_error() {
        let connector = HubSpotConnector::with_base_urls(
            "http://127.0.0.1:1".to_string(),
            "https://app.test".to_string(),
        );
        let err = connector
            .fetch(&credentials(serde_json::json!({"access_token": "t"})))
            .await
            .unwrap_err();

        assert!(matches!(err, IntegrationError::Fetch { provider: "HubSpot", .. }));
        assert!(err.to_string().starts_with("Error fetching HubSpot data"));
    }
}
