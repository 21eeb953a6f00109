//! The response contract shared by every provider.

use serde::{Deserialize, Serialize};

use crate::answer::StructuredAnswer;
use crate::error::ValidationError;
use crate::tooling::ToolPlan;
use crate::types::RetrievedContext;

/// Which generation backend a configuration asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    Remote,
    LocalDaemon,
    #[default]
    Stub,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::LocalDaemon => "local-daemon",
            Self::Stub => "stub",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Whether real generation took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Backend,
    Stub,
}

/// Why a stub answer replaced the requested backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    NotConfigured { detail: String },
    Unavailable { detail: String },
    MalformedOutput { attempts: u32 },
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured { detail } => write!(f, "backend not configured: {detail}"),
            Self::Unavailable { detail } => write!(f, "backend unavailable: {detail}"),
            Self::MalformedOutput { attempts } => write!(f, "backend output malformed after {attempts} attempt(s)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub origin: Origin,
    /// Backend that produced the answer.
    pub provider: ProviderKind,
    /// Backend the process configuration asked for.
    pub requested: ProviderKind,
    pub model: String,
    /// Calls made to the requested backend.
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
}

impl Provenance {
    pub fn is_stub(&self) -> bool { self.origin == Origin::Stub }

    /// Checks that the flag is internally consistent: a stub answer is never
    /// labelled as a backend answer and every substitution carries a reason.
    pub fn check(&self) -> Result<(), ValidationError> {
        let bad = |msg: &str| Err(ValidationError::MalformedProvenance(msg.to_string()));
        if self.model.trim().is_empty() { return bad("model identifier is empty"); }
        match self.origin {
            Origin::Backend => {
                if self.provider == ProviderKind::Stub { return bad("backend origin reported for the stub provider"); }
                if self.provider != self.requested { return bad("backend origin differs from the requested provider"); }
                if self.fallback.is_some() { return bad("backend origin carries a fallback reason"); }
                if self.attempts == 0 { return bad("backend origin without any attempt"); }
            }
            Origin::Stub => {
                if self.provider != ProviderKind::Stub { return bad("stub origin reported for a real provider"); }
                if self.requested != ProviderKind::Stub && self.fallback.is_none() {
                    return bad("stub substituted for a real provider without a reason");
                }
            }
        }
        Ok(())
    }
}

/// The unit returned to all callers, identical in shape for every provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub text: String,
    pub answer: StructuredAnswer,
    pub tool_plan: ToolPlan,
    pub context: RetrievedContext,
    pub provenance: Provenance,
    pub valid: bool,
}
