//! OAuth token exchange logic.
//!
//! Handles exchanging authorization codes for access tokens.

use crate::credentials::Credentials;
use crate::error::{IntegrationError, IntegrationResult};
use anyhow::{anyhow, Context};
use serde::Serialize;
use serde_json::Value;

/// OAuth token exchange request (form encoded)
#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    code: &'a str,
}

/// Exchange authorization code for access token
///
/// # Returns
/// * `Ok(Credentials)` - The token response body, unmodified
/// * `Err(Provider)` - The endpoint answered with a non-success status
/// * `Err(TokenExchange)` - The request could not be sent or the body is not a JSON object
pub async fn exchange_code_for_token(
    http_client: &reqwest::Client,
    token_url: &str,
    code: &str,
    redirect_uri: &str,
    client_id: &str,
    client_secret: &str,
) -> IntegrationResult<Credentials> {
    let form = TokenRequest {
        grant_type: "authorization_code",
        client_id,
        client_secret,
        redirect_uri,
        code,
    };

    tracing::debug!("Exchanging authorization code for token at {}", token_url);

    let response = http_client
        .post(token_url)
        .header("Accept", "application/json")
        .form(&form)
        .send()
        .await
        .context("Failed to send token exchange request")
        .map_err(IntegrationError::TokenExchange)?;

    // A rejected exchange must not be cached as if it were credentials
    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(IntegrationError::Provider(format!(
            "Token exchange failed with status {}: {}",
            status, body
        )));
    }

    let body: Value = response
        .json()
        .await
        .context("Failed to parse token response")
        .map_err(IntegrationError::TokenExchange)?;

    let credentials = Credentials::try_from(body).map_err(|e| {
        IntegrationError::TokenExchange(anyhow!("Unexpected token response: {}", e))
    })?;

    tracing::debug!(
        "Token exchange successful, has_refresh_token={}",
        credentials.refresh_token().is_some()
    );

    Ok(credentials)
}
