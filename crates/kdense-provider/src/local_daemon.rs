//! Local Ollama-compatible daemon backend.

use reqwest::blocking::Client;
use serde_json::json;
use tracing::debug;

use kdense_core::response::ProviderKind;

use crate::http;
use crate::{GenerationBackend, GenerationRequest, ProviderError};

#[derive(Debug)]
pub struct LocalDaemonBackend {
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl LocalDaemonBackend {
    pub fn new(endpoint: &str, model: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Ok(Self { client: http::client(timeout_secs)?, base_url: http::base_url(endpoint), model: model.to_string(), timeout_secs })
    }
}

impl GenerationBackend for LocalDaemonBackend {
    fn kind(&self) -> ProviderKind { ProviderKind::LocalDaemon }

    fn model(&self) -> &str { &self.model }

    fn complete(&self, _request: &GenerationRequest<'_>, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(%url, model = %self.model, "local daemon completion");
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "format": "json",
        });
        let reply = http::send_json(self.client.post(&url).json(&body), self.timeout_secs)?;
        http::text_at(&reply, "/response")
    }
}
