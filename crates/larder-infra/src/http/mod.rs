//! HTTP adapters: the recipe REST backend and the image host.

pub mod gateway;
pub mod media;

use std::time::Duration;

use larder_types::error::{GatewayOperation, PersistenceError};

/// Build the shared reqwest client with the configured timeout.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("larder/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Map a transport-level failure.
pub(crate) fn transport_error(operation: GatewayOperation, err: reqwest::Error) -> PersistenceError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not connect: {err}")
    } else {
        format!("HTTP request failed: {err}")
    };
    PersistenceError::new(operation, reason)
}

/// Turn a non-success response into an error carrying the status and body.
pub(crate) async fn check_status(
    operation: GatewayOperation,
    response: reqwest::Response,
) -> Result<reqwest::Response, PersistenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    let reason = if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    };
    Err(PersistenceError::new(operation, reason))
}
