//! Generation adapter.
//!
//! Turns a feature request (plus project context) into clarification
//! questions and a change plan using a reasoning backend, falling back to
//! fixed keyword-bucket suggestions whenever the backend cannot be used.
//!
//! ## Features
//!
//! - Claude backend over the Anthropic Messages API (`ai` feature)
//! - Credential lookup across config, environment, and `.env` files
//! - Strict parse-then-validate handling of backend output
//! - Deterministic fallback that always satisfies the result schema

mod adapter;
#[cfg(feature = "ai")]
mod claude;
mod credentials;
mod fallback;
mod parse;
mod prompt;

pub use adapter::{BackendStatus, GenerationAdapter};
#[cfg(feature = "ai")]
pub use claude::{ClaudeBackend, DEFAULT_MODEL};
pub use credentials::{CredentialResolver, CredentialSource, ResolvedCredential, SecretValue};
pub use fallback::{fallback_plan, fallback_questions, RequestCategory};
pub use parse::{
    extract_json_array, parse_clarifications, parse_plan, strip_code_fences, validate_item,
    ValidationError, MAX_QUESTIONS,
};
pub use prompt::{
    clarification_prompt, context_section, plan_prompt, MAX_PROMPT_DEPENDENCIES,
    MAX_PROMPT_KEY_FILES,
};

use async_trait::async_trait;

use crate::core::DegradationReason;

/// A text-generation service.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    /// Send one prompt and return the raw response text.
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;

    /// Get the backend name.
    fn name(&self) -> &str;

    /// Verify the backend accepts our credentials.
    async fn handshake(&self) -> anyhow::Result<()>;

    /// Check if the backend is available.
    async fn is_available(&self) -> bool {
        self.handshake().await.is_ok()
    }
}

/// Generation error types.
///
/// These never reach the workflow engine; the adapter turns every one of
/// them into a fallback result.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(DegradationReason),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
