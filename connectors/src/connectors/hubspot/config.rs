/// CRM object collections read by the connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrmObject {
    Contacts,
    Companies,
    Deals,
}

impl CrmObject {
    /// Fetch order of the collections
    pub const ALL: [CrmObject; 3] = [CrmObject::Contacts, CrmObject::Companies, CrmObject::Deals];

    /// Collection path below the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            CrmObject::Contacts => "/crm/v3/objects/contacts",
            CrmObject::Companies => "/crm/v3/objects/companies",
            CrmObject::Deals => "/crm/v3/objects/deals",
        }
    }

    /// Page size requested per collection
    pub fn limit(&self) -> u32 {
        match self {
            CrmObject::Contacts => 100,
            CrmObject::Companies => 50,
            CrmObject::Deals => 50,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrmObject::Contacts => "contacts",
            CrmObject::Companies => "companies",
            CrmObject::Deals => "deals",
        }
    }
}
