//! Item loading endpoint.
//!
//! - `POST /integrations/hubspot/load` - form field `credentials` holds the
//!   JSON token response claimed from the OAuth flow

use crate::connector::Connector;
use axum::{extract::State, response::Json, routing::post, Form, Router};
use crm_bridge::{Credentials, IntegrationError, IntegrationItem};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Shared state for the item handlers.
#[derive(Clone)]
pub struct ItemsAppState {
    pub connector: Arc<dyn Connector>,
}

/// Form body for `POST /integrations/hubspot/load`.
#[derive(Deserialize)]
pub struct LoadItemsForm {
    pub credentials: String,
}

/// Parses the credentials and fetches every item the connector can read.
pub async fn handle_load_items(
    state: &ItemsAppState,
    form: LoadItemsForm,
) -> Result<Vec<IntegrationItem>, IntegrationError> {
    let credentials: Credentials = form.credentials.parse()?;
    let items = state.connector.fetch(&credentials).await?;
    info!(
        connector = state.connector.name(),
        count = items.len(),
        "Integration items loaded"
    );
    Ok(items)
}

async fn load_items(
    State(state): State<Arc<ItemsAppState>>,
    Form(form): Form<LoadItemsForm>,
) -> Result<Json<Vec<IntegrationItem>>, IntegrationError> {
    handle_load_items(&state, form).await.map(Json)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn create_items_router(state: ItemsAppState) -> Router {
    Router::new()
        .route("/integrations/hubspot/load", post(load_items))
        .with_state(Arc::new(state))
}
