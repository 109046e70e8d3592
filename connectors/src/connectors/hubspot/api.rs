use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::config::CrmObject;

/// A CRM object as returned by the v3 objects API.
#[derive(Debug, Clone, Deserialize)]
pub struct HubSpotRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl HubSpotRecord {
    /// String value of a property; missing and null read as `None`
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|props| props.get(name))
            .and_then(Value::as_str)
    }
}

/// One page of a collection listing.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<HubSpotRecord>,
}

/// Object ids are strings in v3 but older payloads carry numbers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// HTTP client for the HubSpot CRM REST API.
///
/// Authenticates with a Bearer token.
pub struct HubSpotClient {
    access_token: String,
    http_client: Client,
    base_url: String,
}

impl HubSpotClient {
    pub fn new(http_client: Client, access_token: String, base_url: String) -> Self {
        Self {
            access_token,
            http_client,
            base_url,
        }
    }

    /// Fetch the first page of a collection.
    ///
    /// Returns `Ok(None)` when the API answers with anything but 200 OK; only
    /// transport failures and unreadable bodies are errors.
    pub async fn fetch_objects(&self, object: CrmObject) -> Result<Option<Vec<HubSpotRecord>>> {
        let url = format!("{}{}", self.base_url, object.path());
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header("Content-Type", "application/json")
            .query(&[("limit", object.limit())])
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", object.as_str()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(
                object = object.as_str(),
                status = %status,
                "HubSpot endpoint returned non-200, skipping"
            );
            return Ok(None);
        }

        let page = response
            .json::<ListResponse>()
            .await
            .with_context(|| format!("Failed to parse {} response", object.as_str()))?;
        Ok(Some(page.results))
    }
}
