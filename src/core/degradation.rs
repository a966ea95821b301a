//! Graceful degradation and fallback bookkeeping.
//!
//! Tracks why the reasoning backend is unavailable and wraps results so
//! callers can tell backend output from deterministic fallback output.

use std::fmt;

/// Reason why the reasoning backend is degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradationReason {
    /// Backend disabled in config
    Disabled,
    /// No credential found in any source
    MissingCredentials,
    /// A credential was found but the backend rejected or did not answer the handshake
    HandshakeFailed(String),
    /// Backend not compiled in (built without the `ai` feature)
    NotCompiled,
    /// Provider name in config is not supported
    UnknownProvider(String),
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradationReason::Disabled => write!(f, "disabled in configuration"),
            DegradationReason::MissingCredentials => write!(f, "missing API key or credentials"),
            DegradationReason::HandshakeFailed(s) => write!(f, "handshake failed: {}", s),
            DegradationReason::NotCompiled => write!(f, "built without backend support"),
            DegradationReason::UnknownProvider(p) => write!(f, "unknown provider '{}'", p),
        }
    }
}

impl DegradationReason {
    /// How to get out of this state.
    pub fn recovery_hint(&self) -> Option<String> {
        match self {
            DegradationReason::Disabled => {
                Some("Set `ai.enabled = true` in the config".to_string())
            }
            DegradationReason::MissingCredentials => Some(
                "Set ai.api_key, export ANTHROPIC_API_KEY, or add it to a .env file".to_string(),
            ),
            DegradationReason::HandshakeFailed(_) => Some(
                "Check the API key and network, then run 'planwright status --refresh'".to_string(),
            ),
            DegradationReason::NotCompiled => {
                Some("Rebuild with the 'ai' feature enabled".to_string())
            }
            DegradationReason::UnknownProvider(_) => {
                Some("Set `ai.provider = \"claude\"` in the config".to_string())
            }
        }
    }
}

/// Fallback result indicating what fallback was used.
#[derive(Debug)]
pub struct FallbackResult<T> {
    /// The result value
    pub value: T,
    /// Whether a fallback was used
    pub used_fallback: bool,
    /// Description of why the fallback was used
    pub fallback_description: Option<String>,
}

impl<T> FallbackResult<T> {
    /// Create a primary (non-fallback) result.
    pub fn primary(value: T) -> Self {
        Self { value, used_fallback: false, fallback_description: None }
    }

    /// Create a fallback result.
    pub fn fallback(value: T, description: impl Into<String>) -> Self {
        Self { value, used_fallback: true, fallback_description: Some(description.into()) }
    }

    /// Unwrap into the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}
