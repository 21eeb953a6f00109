use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;

use crate::ProviderError;

pub(crate) fn client(timeout_secs: u64) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::Unavailable(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn base_url(endpoint: &str) -> String { endpoint.trim().trim_end_matches('/').to_string() }

/// Send `req` and return the JSON body of a 2xx reply. Transport failures,
/// timeouts, non-2xx statuses and undecodable bodies are all `Unavailable`.
pub(crate) fn send_json(req: RequestBuilder, timeout_secs: u64) -> Result<Value, ProviderError> {
    let response = req.send().map_err(|e| {
        if e.is_timeout() {
            ProviderError::Unavailable(format!("request timed out after {timeout_secs}s"))
        } else {
            ProviderError::Unavailable(format!("request failed: {e}"))
        }
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Unavailable(format!("backend returned HTTP {status}")));
    }
    response.json::<Value>().map_err(|e| ProviderError::Unavailable(format!("unreadable response body: {e}")))
}

/// Non-empty string at `pointer`, else `Unavailable`.
pub(crate) fn text_at(body: &Value, pointer: &str) -> Result<String, ProviderError> {
    match body.pointer(pointer).and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ProviderError::Unavailable(format!("empty completion (no text at {pointer})"))),
    }
}
