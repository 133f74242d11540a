//! Shared HTTP plumbing for the REST transports.

use cinebreak_error::{CinebreakResult, ProviderError, ProviderErrorKind};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, error};

/// Build the HTTP client shared by a transport.
///
/// `timeout` applies to each whole request; `None` leaves requests unbounded.
///
/// # Errors
///
/// Returns a `ProviderError` if the TLS backend cannot be initialized.
pub fn build_http_client(timeout: Option<Duration>) -> CinebreakResult<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| {
        ProviderError::new(ProviderErrorKind::Request(format!(
            "Failed to build HTTP client: {}",
            e
        )))
        .into()
    })
}

/// Pull the human-readable message out of a provider error body.
///
/// Understands `{"error": {"message": ...}}` (Gemini, OpenAI-compatible) and
/// `{"error": "..."}` (proxy backends). Anything else is returned verbatim.
pub fn provider_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    match value.get("error") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(serde_json::Value::Object(inner)) => inner
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        _ => body.to_string(),
    }
}

/// Send a prepared request and return the body of a successful response.
pub(crate) async fn send(request: RequestBuilder, provider: &str) -> CinebreakResult<String> {
    // Errors are stripped of their URL, which may carry credentials.
    let response = request.send().await.map_err(|e| {
        let e = e.without_url();
        error!(provider, error = ?e, "Failed to send request");
        ProviderError::new(ProviderErrorKind::Request(format!("{}: {}", provider, e)))
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        let e = e.without_url();
        error!(provider, error = ?e, "Failed to read response body");
        ProviderError::new(ProviderErrorKind::Request(format!(
            "{}: failed to read body: {}",
            provider, e
        )))
    })?;

    if !status.is_success() {
        error!(provider, status = %status, body = %body, "Provider returned error");
        return Err(ProviderError::new(ProviderErrorKind::Http {
            status_code: status.as_u16(),
            message: provider_error_message(&body),
        })
        .into());
    }

    debug!(provider, bytes = body.len(), "Received response");
    Ok(body)
}

/// Decode a JSON response body.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    body: &str,
    provider: &str,
) -> CinebreakResult<T> {
    serde_json::from_str(body).map_err(|e| {
        error!(provider, error = %e, "Failed to parse response");
        ProviderError::new(ProviderErrorKind::Decode(format!("{}: {}", provider, e))).into()
    })
}
