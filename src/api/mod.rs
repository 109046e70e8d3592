// HTTP surface of the OAuth flow

pub mod oauth;

pub use oauth::{create_oauth_router, OAuthAppState, CLOSE_WINDOW_HTML};

use crate::cache::KeyValueCache;
use crate::error::IntegrationError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntegrationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntegrationError::Provider(_)
            | IntegrationError::MalformedState(_)
            | IntegrationError::StateMismatch
            | IntegrationError::NoCredentials
            | IntegrationError::MissingToken
            | IntegrationError::MissingParameter(_)
            | IntegrationError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            IntegrationError::TokenExchange(_) => StatusCode::BAD_GATEWAY,
            IntegrationError::Fetch { .. } | IntegrationError::Cache(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for IntegrationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    cache: &'static str,
}

/// Create health check router
pub fn create_health_router(cache: Arc<dyn KeyValueCache>) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(cache)
}

/// GET /health
async fn health(State(cache): State<Arc<dyn KeyValueCache>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: cache.backend(),
    })
}
