//! kdense-provider
//!
//! One synchronous generation contract over three interchangeable backends:
//! a hosted OpenAI-compatible API, a local Ollama-compatible daemon, and a
//! deterministic stub. Whatever the backend does, `Provider::generate`
//! always returns a structurally valid answer and a truthful provenance.

pub mod local_daemon;
pub mod parse;
pub mod prompt;
pub mod remote;
pub mod render;
pub mod scripted;
pub mod stub;

mod http;

use thiserror::Error;
use tracing::{info, warn};

use kdense_core::answer::StructuredAnswer;
use kdense_core::config::ProviderSettings;
use kdense_core::response::{FallbackReason, Origin, Provenance, ProviderKind};
use kdense_core::tooling::ToolPlan;
use kdense_core::types::{AgentQuery, RetrievedContext};

pub use local_daemon::LocalDaemonBackend;
pub use remote::RemoteBackend;
pub use scripted::ScriptedBackend;
pub use stub::StubBackend;

pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_REMOTE_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_LOCAL_MODEL: &str = "llama3.1:8b";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Unreachable, timed out, rejected the request or replied with nothing.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Replied, but not in the shape the contract requires.
    #[error("Malformed provider output: {0}")]
    Malformed(String),
}

/// Everything a backend may use to produce an answer.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub query: &'a AgentQuery,
    pub context: &'a RetrievedContext,
    pub plan: &'a ToolPlan,
}

pub trait GenerationBackend: Send + Sync {
    fn kind(&self) -> ProviderKind;
    /// Model identifier reported in provenance.
    fn model(&self) -> &str;
    /// Raw completion text for `prompt`. Network backends ignore `request`;
    /// the stub ignores `prompt`.
    fn complete(&self, request: &GenerationRequest<'_>, prompt: &str) -> Result<String, ProviderError>;
}

impl<T: GenerationBackend + ?Sized> GenerationBackend for std::sync::Arc<T> {
    fn kind(&self) -> ProviderKind { (**self).kind() }

    fn model(&self) -> &str { (**self).model() }

    fn complete(&self, request: &GenerationRequest<'_>, prompt: &str) -> Result<String, ProviderError> {
        (**self).complete(request, prompt)
    }
}

/// Output of one `Provider::generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub answer: StructuredAnswer,
    pub provenance: Provenance,
    pub valid: bool,
}

/// The backend selected for this process plus the retry and fallback policy.
pub struct Provider {
    backend: Box<dyn GenerationBackend>,
    requested: ProviderKind,
    not_configured: Option<String>,
    max_attempts: u32,
    fallback: StubBackend,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("backend", &self.backend.kind())
            .field("model", &self.backend.model())
            .field("requested", &self.requested)
            .field("not_configured", &self.not_configured)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl Provider {
    /// Resolve the backend once from configuration. A remote provider without
    /// a credential, or a local daemon without an endpoint, resolves to the
    /// stub and reports why on every answer.
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        let endpoint = settings.endpoint.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let model = settings.model.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let provider = match settings.kind {
            ProviderKind::Stub => Self::stub(),
            ProviderKind::Remote => match settings.api_key.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                None => Self::unconfigured(ProviderKind::Remote, "no API credential configured"),
                Some(key) => match RemoteBackend::new(
                    endpoint.unwrap_or(DEFAULT_REMOTE_ENDPOINT),
                    model.unwrap_or(DEFAULT_REMOTE_MODEL),
                    key,
                    settings.timeout_secs,
                ) {
                    Ok(b) => Self::with_backend(Box::new(b), settings.max_attempts),
                    Err(e) => Self::unconfigured(ProviderKind::Remote, &e.to_string()),
                },
            },
            ProviderKind::LocalDaemon => match endpoint {
                None => Self::unconfigured(ProviderKind::LocalDaemon, "no daemon endpoint configured"),
                Some(ep) => match LocalDaemonBackend::new(ep, model.unwrap_or(DEFAULT_LOCAL_MODEL), settings.timeout_secs) {
                    Ok(b) => Self::with_backend(Box::new(b), settings.max_attempts),
                    Err(e) => Self::unconfigured(ProviderKind::LocalDaemon, &e.to_string()),
                },
            },
        };
        match &provider.not_configured {
            Some(why) => warn!(requested = %provider.requested, reason = %why, "provider resolved to deterministic stub"),
            None => info!(provider = %provider.kind(), model = %provider.model(), "provider resolved"),
        }
        provider
    }

    /// Use `backend` for every call; at most `max_attempts` calls per request.
    pub fn with_backend(backend: Box<dyn GenerationBackend>, max_attempts: u32) -> Self {
        let requested = backend.kind();
        Self { backend, requested, not_configured: None, max_attempts: max_attempts.max(1), fallback: StubBackend }
    }

    pub fn stub() -> Self { Self::with_backend(Box::new(StubBackend), 1) }

    fn unconfigured(requested: ProviderKind, why: &str) -> Self {
        Self { requested, not_configured: Some(why.to_string()), ..Self::stub() }
    }

    /// The backend that will actually be called.
    pub fn kind(&self) -> ProviderKind { self.backend.kind() }

    pub fn requested(&self) -> ProviderKind { self.requested }

    pub fn model(&self) -> &str { self.backend.model() }

    /// Produce an answer for `request`.
    ///
    /// Malformed backend output is retried with a stricter instruction until
    /// `max_attempts` calls have been made; an unavailable backend is not
    /// retried. Either way the result then comes from the stub, and the
    /// provenance says so.
    pub fn generate(&self, request: &GenerationRequest<'_>) -> Generation {
        if let Some(why) = &self.not_configured {
            return self.fallback_generation(request, Some(FallbackReason::NotConfigured { detail: why.clone() }), 0);
        }
        let mut attempts = 0;
        let reason = loop {
            if attempts >= self.max_attempts { break FallbackReason::MalformedOutput { attempts }; }
            attempts += 1;
            let prompt = prompt::build_prompt(request, attempts > 1);
            let raw = match self.backend.complete(request, &prompt) {
                Ok(raw) => raw,
                Err(ProviderError::Unavailable(detail)) => {
                    warn!(provider = %self.kind(), attempt = attempts, error = %detail, "provider unavailable");
                    break FallbackReason::Unavailable { detail };
                }
                Err(ProviderError::Malformed(detail)) => {
                    warn!(provider = %self.kind(), attempt = attempts, error = %detail, "malformed provider reply");
                    continue;
                }
            };
            match parse::parse_structured(&raw) {
                Ok(answer) => {
                    let origin = if self.kind() == ProviderKind::Stub { Origin::Stub } else { Origin::Backend };
                    let provenance = Provenance {
                        origin,
                        provider: self.kind(),
                        requested: self.requested,
                        model: self.model().to_string(),
                        attempts,
                        fallback: None,
                    };
                    return finish(request, answer, provenance);
                }
                Err(e) => warn!(provider = %self.kind(), attempt = attempts, error = %e, "provider output failed validation"),
            }
        };
        warn!(requested = %self.requested, reason = %reason, "falling back to deterministic stub");
        self.fallback_generation(request, Some(reason), attempts)
    }

    fn fallback_generation(&self, request: &GenerationRequest<'_>, reason: Option<FallbackReason>, attempts: u32) -> Generation {
        let provenance = Provenance {
            origin: Origin::Stub,
            provider: ProviderKind::Stub,
            requested: self.requested,
            model: self.fallback.model().to_string(),
            attempts,
            fallback: reason,
        };
        finish(request, self.fallback.answer(request), provenance)
    }
}

fn finish(request: &GenerationRequest<'_>, answer: StructuredAnswer, provenance: Provenance) -> Generation {
    let text = render::render_text(request, &answer, &provenance);
    let valid = answer.has_content();
    Generation { text, answer, provenance, valid }
}
