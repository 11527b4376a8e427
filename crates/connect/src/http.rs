//! Shared reqwest plumbing for the collaborator clients.

use fintrack_core::errors::{Error, Result};
use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default timeout for collaborator requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub(crate) fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Reads the body and decodes it, turning non-2xx answers into
/// external-service errors tagged with `service`.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    service: &str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::ExternalService(format!("{}: failed to read response: {}", service, e)))?;

    if !status.is_success() {
        debug!("[{}] HTTP {}: {}", service, status, body);
        return Err(Error::ExternalService(format!(
            "{} error {}: {}",
            service,
            status,
            body.chars().take(200).collect::<String>()
        )));
    }

    serde_json::from_str(&body).map_err(|e| {
        Error::ExternalService(format!("{}: failed to parse response: {}", service, e))
    })
}

pub(crate) fn request_failed(service: &str, err: reqwest::Error) -> Error {
    Error::ExternalService(format!("{}: request failed: {}", service, err))
}
