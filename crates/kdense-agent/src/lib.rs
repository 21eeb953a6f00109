//! kdense-agent
//!
//! The research pipeline: retrieve context, plan tools, generate, validate.

pub mod orchestrator;
pub mod stage;

pub use orchestrator::{Orchestrator, RunReport};
pub use stage::Stage;

use kdense_core::error::ValidationError;
use kdense_core::response::AgentResponse;

/// Final gate before a response leaves the orchestrator.
pub fn validate_response(response: &AgentResponse) -> Result<(), ValidationError> {
    if response.text.trim().is_empty() { return Err(ValidationError::EmptyText); }
    if !response.valid { return Err(ValidationError::NotValidated); }
    response.provenance.check()
}
