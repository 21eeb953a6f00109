//! Hosted, OpenAI-compatible chat-completions backend.

use reqwest::blocking::Client;
use serde_json::json;
use tracing::debug;

use kdense_core::response::ProviderKind;

use crate::http;
use crate::{GenerationBackend, GenerationRequest, ProviderError};

const SYSTEM_PROMPT: &str = "You are a careful oncology research assistant. You answer with JSON only.";

pub struct RemoteBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBackend").field("base_url", &self.base_url).field("model", &self.model).finish_non_exhaustive()
    }
}

impl RemoteBackend {
    pub fn new(endpoint: &str, model: &str, api_key: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::client(timeout_secs)?,
            base_url: http::base_url(endpoint),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout_secs,
        })
    }
}

impl GenerationBackend for RemoteBackend {
    fn kind(&self) -> ProviderKind { ProviderKind::Remote }

    fn model(&self) -> &str { &self.model }

    fn complete(&self, _request: &GenerationRequest<'_>, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(%url, model = %self.model, "remote completion");
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "temperature": 0.0,
            "response_format": {"type": "json_object"},
        });
        let req = self.client.post(&url).bearer_auth(&self.api_key).json(&body);
        let reply = http::send_json(req, self.timeout_secs)?;
        http::text_at(&reply, "/choices/0/message/content")
    }
}
