//! OAuth endpoints for the HubSpot integration.
//!
//! The frontend opens the authorization URL in a popup; the provider redirects
//! the popup to the callback, which closes it. The frontend then claims the
//! credentials once.

use crate::error::IntegrationError;
use crate::oauth::{OAuthCallback, OAuthFlow};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Page returned to the authorization popup once the callback succeeds
pub const CLOSE_WINDOW_HTML: &str = r#"<html>
    <script>
        window.close();
    </script>
</html>"#;

/// Shared application state for OAuth API
#[derive(Clone)]
pub struct OAuthAppState {
    pub flow: OAuthFlow,
}

/// Form body identifying the user and organization
#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub user_id: String,
    pub org_id: String,
}

/// Create OAuth API router
pub fn create_oauth_router(state: OAuthAppState) -> Router {
    Router::new()
        .route("/integrations/hubspot/authorize", post(authorize))
        .route("/integrations/hubspot/oauth2callback", get(oauth_callback))
        .route("/integrations/hubspot/credentials", post(credentials))
        .with_state(Arc::new(state))
}

/// POST /integrations/hubspot/authorize
///
/// Returns the provider authorization URL as a JSON string.
async fn authorize(
    State(state): State<Arc<OAuthAppState>>,
    Form(form): Form<UserForm>,
) -> Result<Json<String>, IntegrationError> {
    debug!(user_id = %form.user_id, org_id = %form.org_id, "Authorization requested");
    let url = state.flow.authorize(&form.user_id, &form.org_id).await?;
    Ok(Json(url))
}

/// GET /integrations/hubspot/oauth2callback
///
/// Provider redirect target. Responds with a page that closes the popup.
async fn oauth_callback(
    State(state): State<Arc<OAuthAppState>>,
    Query(callback): Query<OAuthCallback>,
) -> Result<Response, IntegrationError> {
    debug!("OAuth callback received");
    state.flow.handle_callback(&callback).await?;
    Ok(Html(CLOSE_WINDOW_HTML).into_response())
}

/// POST /integrations/hubspot/credentials
///
/// Returns the token response once; later calls fail until the next callback.
async fn credentials(
    State(state): State<Arc<OAuthAppState>>,
    Form(form): Form<UserForm>,
) -> Result<Response, IntegrationError> {
    let credentials = state
        .flow
        .retrieve_credentials(&form.user_id, &form.org_id)
        .await?;
    Ok(Json(credentials).into_response())
}
