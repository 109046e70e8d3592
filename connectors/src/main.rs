use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use crm_bridge::api::{create_health_router, create_oauth_router, OAuthAppState};
use crm_bridge::cache;
use crm_bridge::config::{load_config, BridgeConfig};
use crm_bridge::oauth::OAuthFlow;
use crm_connectors::api::{create_items_router, ItemsAppState};
use crm_connectors::HubSpotConnector;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crm_bridge=info,crm_connectors=info".into()),
        )
        .init();

    info!("CRM bridge starting...");

    // File config is optional; environment always wins
    let config = match std::env::var("CRM_BRIDGE_CONFIG") {
        Ok(path) => load_config(&path)?,
        Err(_) => BridgeConfig::default(),
    }
    .with_env_overrides();

    if config.hubspot.client_id.is_empty() || config.hubspot.client_secret.is_empty() {
        warn!("HubSpot client credentials are not configured; token exchange will fail");
    }

    info!(
        bind_addr = %config.server.bind_addr,
        cache_backend = %config.cache.backend,
        allowed_origin = %config.server.allowed_origin,
        "Configuration loaded"
    );

    let cache = cache::connect(&config.cache)
        .await
        .context("Failed to initialize cache")?;
    info!(backend = cache.backend(), "Cache initialized");

    let flow = OAuthFlow::new(&config.hubspot, Arc::clone(&cache));
    let connector = Arc::new(HubSpotConnector::from_config(&config.hubspot));

    let origin: HeaderValue = config
        .server
        .allowed_origin
        .parse()
        .context("allowed_origin must be a valid header value")?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let app = create_oauth_router(OAuthAppState { flow })
        .merge(create_items_router(ItemsAppState { connector }))
        .merge(create_health_router(cache))
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("CRM bridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl_c signal");
        return;
    }
    info!("Shutdown signal received");
}
