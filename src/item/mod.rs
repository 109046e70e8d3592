//! Normalized integration item shared by all connectors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of CRM record an item was projected from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    Contact,
    Company,
    Deal,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Contact => "Contact",
            ItemType::Company => "Company",
            ItemType::Deal => "Deal",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider record reduced to the fields every integration exposes.
///
/// Timestamps are passed through as the provider formats them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrationItem {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    pub creation_time: Option<String>,
    pub last_modified_time: Option<String>,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_serialization() {
        let item = IntegrationItem {
            id: Some("1".to_string()),
            item_type: ItemType::Deal,
            name: "Big deal".to_string(),
            creation_time: Some("2024-01-01T00:00:00Z".to_string()),
            last_modified_time: None,
            url: Some("https://app.hubspot.com/contacts/1".to_string()),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "Deal");
        assert_eq!(json["name"], "Big deal");
        assert_eq!(json["last_modified_time"], serde_json::Value::Null);
    }

    #[test]
    fn test_item_type_display() {
        assert_eq!(ItemType::Contact.to_string(), "Contact");
        assert_eq!(ItemType::Company.as_str(), "Company");
    }
}
