//! OAuth credentials as returned by a provider's token endpoint.
//!
//! The token response is kept verbatim: the controller stores it in the cache
//! without interpreting it, and connectors only read `access_token` from it.

use crate::error::IntegrationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque token response (access_token, refresh_token, expires_in, ...).
///
/// Serializes exactly as the provider sent it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(Map<String, Value>);

impl Credentials {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The bearer token, if present as a non-empty string
    pub fn access_token(&self) -> Option<&str> {
        self.0
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.0.get("refresh_token").and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl TryFrom<Value> for Credentials {
    type Error = IntegrationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(IntegrationError::InvalidCredentials(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl std::str::FromStr for Credentials {
    type Err = IntegrationError;

    /// Parse credentials from their serialized JSON form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| IntegrationError::InvalidCredentials(e.to_string()))?;
        Self::try_from(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_token_response() {
        let creds: Credentials = r#"{
            "access_token": "at_123",
            "refresh_token": "rt_456",
            "expires_in": 1800,
            "token_type": "bearer"
        }"#
        .parse()
        .unwrap();

        assert_eq!(creds.access_token(), Some("at_123"));
        assert_eq!(creds.refresh_token(), Some("rt_456"));
        assert_eq!(creds.get("expires_in"), Some(&json!(1800)));
    }

    #[test]
    fn test_empty_access_token_is_absent() {
        let creds = Credentials::try_from(json!({"access_token": ""})).unwrap();
        assert_eq!(creds.access_token(), None);

        let creds = Credentials::try_from(json!({"access_token": 42})).unwrap();
        assert_eq!(creds.access_token(), None);
    }

    #[test]
    fn test_non_object_rejected() {
        let err = "[1, 2]".parse::<Credentials>().unwrap_err();
        assert!(matches!(err, IntegrationError::InvalidCredentials(ref m) if m.contains("an array")));

        let err = "not json".parse::<Credentials>().unwrap_err();
        assert!(matches!(err, IntegrationError::InvalidCredentials(_)));
    }

    #[test]
    fn test_serializes_verbatim() {
        let raw = json!({"access_token": "abc", "hub_id": 7});
        let creds = Credentials::try_from(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&creds).unwrap(), raw);
    }
}
