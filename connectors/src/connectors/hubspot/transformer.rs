use crm_bridge::{IntegrationItem, ItemType};

use super::api::HubSpotRecord;
use super::config::CrmObject;

/// Transform a HubSpot record of the given collection into an item.
pub fn record_to_item(object: CrmObject, record: &HubSpotRecord, app_base_url: &str) -> IntegrationItem {
    match object {
        CrmObject::Contacts => contact_to_item(record, app_base_url),
        CrmObject::Companies => company_to_item(record, app_base_url),
        CrmObject::Deals => deal_to_item(record, app_base_url),
    }
}

/// Name: `"{firstname} {lastname}"`, each part empty when missing.
pub fn contact_to_item(record: &HubSpotRecord, app_base_url: &str) -> IntegrationItem {
    let name = format!(
        "{} {}",
        record.property("firstname").unwrap_or(""),
        record.property("lastname").unwrap_or("")
    );
    build_item(record, ItemType::Contact, name, app_base_url)
}

/// Name: `properties.name`, or "Unnamed Company".
pub fn company_to_item(record: &HubSpotRecord, app_base_url: &str) -> IntegrationItem {
    let name = record.property("name").unwrap_or("Unnamed Company").to_string();
    build_item(record, ItemType::Company, name, app_base_url)
}

/// Name: `properties.dealname`, or "Unnamed Deal".
pub fn deal_to_item(record: &HubSpotRecord, app_base_url: &str) -> IntegrationItem {
    let name = record.property("dealname").unwrap_or("Unnamed Deal").to_string();
    build_item(record, ItemType::Deal, name, app_base_url)
}

// Every object type links through the contacts path of the web app
fn build_item(
    record: &HubSpotRecord,
    item_type: ItemType,
    name: String,
    app_base_url: &str,
) -> IntegrationItem {
    IntegrationItem {
        id: record.id.clone(),
        item_type,
        name,
        creation_time: record.created_at.clone(),
        last_modified_time: record.updated_at.clone(),
        url: record
            .id
            .as_ref()
            .map(|id| format!("{}/contacts/{}", app_base_url, id)),
    }
}
