//! Scripted backend for tests and offline demos.

use std::sync::{Mutex, PoisonError};

use kdense_core::response::ProviderKind;

use crate::{GenerationBackend, GenerationRequest, ProviderError};

/// Replays canned replies in order; the last one repeats once the script
/// runs out. Every prompt it receives is recorded.
pub struct ScriptedBackend {
    kind: ProviderKind,
    model: String,
    replies: Mutex<Vec<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(kind: ProviderKind, replies: Vec<Result<String, ProviderError>>) -> Self {
        Self { kind, model: format!("scripted-{kind}"), replies: Mutex::new(replies), prompts: Mutex::new(Vec::new()) }
    }

    pub fn always(kind: ProviderKind, reply: Result<String, ProviderError>) -> Self { Self::new(kind, vec![reply]) }

    pub fn call_count(&self) -> usize { self.prompts.lock().unwrap_or_else(PoisonError::into_inner).len() }

    pub fn prompts(&self) -> Vec<String> { self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clone() }
}

impl GenerationBackend for ScriptedBackend {
    fn kind(&self) -> ProviderKind { self.kind }

    fn model(&self) -> &str { &self.model }

    fn complete(&self, _request: &GenerationRequest<'_>, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).push(prompt.to_string());
        let mut replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        match replies.len() {
            0 => Err(ProviderError::Unavailable("script exhausted".into())),
            1 => replies[0].clone(),
            _ => replies.remove(0),
        }
    }
}
