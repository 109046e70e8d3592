//! CRM connectors - fetch records from external CRMs as integration items.
//!
//! Credentials come from the OAuth flow in the `crm_bridge` crate; the
//! frontend claims them once and posts them back here to load items.
//!
//! # Architecture
//!
//! ```text
//! Frontend popup
//!          ↓
//!     OAuth (crm_bridge: authorize, callback, credentials)
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │       Connector (implements trait)       │
//! │  - Query the CRM REST API                │
//! │  - Normalize into IntegrationItem        │
//! └─────────────────────────────────────────┘
//!          ↓
//!     POST /integrations/hubspot/load
//! ```
//!
//! # Core Types
//!
//! - [`Connector`] - Trait that all connectors implement
//! - [`HubSpotConnector`] - Contacts, companies and deals from HubSpot
//! - [`Credentials`] / [`IntegrationItem`] - Re-exported from `crm_bridge`
//!
//! # Loading Items
//!
//! ```no_run
//! use crm_connectors::{Connector, Credentials, HubSpotConnector};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let credentials: Credentials = r#"{"access_token": "..."}"#.parse()?;
//! let items = HubSpotConnector::new().fetch(&credentials).await?;
//! for item in items {
//!     println!("{} {}", item.item_type, item.name);
//! }
//! # Ok(())
//! # }
//! ```

mod connector;
pub mod api;
pub mod connectors;

// Re-export public types
pub use connector::Connector;
pub use connectors::hubspot::HubSpotConnector;

// Re-export shared types from crm_bridge for convenience
pub use crm_bridge::{Credentials, IntegrationItem};
