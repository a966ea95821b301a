//! The generation adapter.
//!
//! Wraps an unreliable [`ReasoningBackend`] behind two operations that always
//! produce a usable result. Backend output goes through the strict parsers in
//! [`super::parse`]; anything they reject, and any backend error, is replaced
//! by the deterministic fallback for the request. There are no retries.

use std::path::Path;
#[cfg(feature = "ai")]
use std::time::Duration;

use crate::context::ProjectContext;
use crate::core::{AiConfig, DegradationReason, FallbackResult};
use crate::workflow::PlanItem;

use super::credentials::{CredentialResolver, CredentialSource, SecretValue};
use super::fallback::{fallback_plan, fallback_questions};
use super::parse::{parse_clarifications, parse_plan, ValidationError};
use super::prompt::{clarification_prompt, plan_prompt};
use super::{GenerationError, ReasoningBackend};

/// Default characters of each config file included in prompts.
const DEFAULT_EXCERPT_CHARS: usize = 600;

/// Whether the adapter can reach its backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    /// Backend connected
    Ready {
        provider: String,
        /// Where the key came from (`None` for injected backends)
        source: Option<CredentialSource>,
    },
    /// Every call uses the deterministic fallback
    Fallback(DegradationReason),
}

impl BackendStatus {
    /// Whether the backend is connected.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Produces clarification questions and plans, with deterministic fallback.
pub struct GenerationAdapter {
    backend: Option<Box<dyn ReasoningBackend>>,
    status: BackendStatus,
    resolver: Option<CredentialResolver>,
    config: AiConfig,
    excerpt_chars: usize,
}

impl GenerationAdapter {
    /// Resolve credentials and handshake with the configured backend.
    ///
    /// Never fails: problems leave the adapter in fallback mode with the
    /// reason recorded in [`GenerationAdapter::status`].
    pub async fn connect(config: &AiConfig, project_root: Option<&Path>) -> Self {
        let mut resolver = CredentialResolver::new(config);
        if let Some(root) = project_root {
            resolver = resolver.with_project_root(root);
        }
        Self::connect_with(config, resolver).await
    }

    /// Like [`GenerationAdapter::connect`] with an explicit resolver.
    pub async fn connect_with(config: &AiConfig, resolver: CredentialResolver) -> Self {
        let mut adapter = Self {
            backend: None,
            status: BackendStatus::Fallback(DegradationReason::MissingCredentials),
            resolver: Some(resolver),
            config: config.clone(),
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        };
        adapter.refresh().await;
        adapter
    }

    /// Adapter that never contacts a backend.
    pub fn offline(reason: DegradationReason) -> Self {
        Self {
            backend: None,
            status: BackendStatus::Fallback(reason),
            resolver: None,
            config: AiConfig::default(),
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }

    /// Adapter using an already-constructed backend, assumed reachable.
    pub fn with_backend(backend: Box<dyn ReasoningBackend>) -> Self {
        let status = BackendStatus::Ready { provider: backend.name().to_string(), source: None };
        Self {
            backend: Some(backend),
            status,
            resolver: None,
            config: AiConfig::default(),
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }

    /// Characters of each config file included in prompts.
    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    /// Current backend status.
    pub fn status(&self) -> &BackendStatus {
        &self.status
    }

    /// Whether calls currently reach the backend.
    pub fn is_backend_ready(&self) -> bool {
        self.status.is_ready() && self.backend.is_some()
    }

    /// Re-run credential resolution and the handshake.
    ///
    /// Injected backends are re-checked in place.
    pub async fn refresh(&mut self) -> &BackendStatus {
        if let Some(resolver) = &self.resolver {
            match Self::open_backend(&self.config, resolver).await {
                Ok((backend, source)) => {
                    tracing::info!(
                        provider = backend.name(),
                        %source,
                        "Reasoning backend connected"
                    );
                    self.status = BackendStatus::Ready {
                        provider: backend.name().to_string(),
                        source: Some(source),
                    };
                    self.backend = Some(backend);
                }
                Err(reason) => {
                    tracing::warn!(
                        %reason,
                        "Reasoning backend unavailable, using built-in suggestions"
                    );
                    self.backend = None;
                    self.status = BackendStatus::Fallback(reason);
                }
            }
        } else if let Some(backend) = &self.backend {
            self.status = match backend.handshake().await {
                Ok(()) => {
                    BackendStatus::Ready { provider: backend.name().to_string(), source: None }
                }
                Err(e) => {
                    BackendStatus::Fallback(DegradationReason::HandshakeFailed(e.to_string()))
                }
            };
        }

        &self.status
    }

    /// Up to three clarification questions for `request`.
    pub async fn propose_clarifications(
        &self,
        request: &str,
        context: Option<&ProjectContext>,
    ) -> FallbackResult<Vec<String>> {
        let backend = match self.ready_backend() {
            Ok(backend) => backend,
            Err(e) => return FallbackResult::fallback(fallback_questions(request), e.to_string()),
        };

        let prompt = clarification_prompt(request, context, self.excerpt_chars);
        match generate(backend, &prompt, parse_clarifications).await {
            Ok(questions) => FallbackResult::primary(questions),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Clarification generation failed, using built-in questions"
                );
                FallbackResult::fallback(fallback_questions(request), e.to_string())
            }
        }
    }

    /// A non-empty change plan for `request` given the clarification answers.
    pub async fn propose_plan(
        &self,
        request: &str,
        answers: &[(&str, &str)],
        context: Option<&ProjectContext>,
    ) -> FallbackResult<Vec<PlanItem>> {
        let backend = match self.ready_backend() {
            Ok(backend) => backend,
            Err(e) => return FallbackResult::fallback(fallback_plan(request), e.to_string()),
        };

        let prompt = plan_prompt(request, answers, context, self.excerpt_chars);
        match generate(backend, &prompt, parse_plan).await {
            Ok(plan) => FallbackResult::primary(plan),
            Err(e) => {
                tracing::warn!(error = %e, "Plan generation failed, using built-in plan");
                FallbackResult::fallback(fallback_plan(request), e.to_string())
            }
        }
    }

    fn ready_backend(&self) -> Result<&dyn ReasoningBackend, GenerationError> {
        match (&self.status, &self.backend) {
            (BackendStatus::Ready { .. }, Some(backend)) => Ok(backend.as_ref()),
            (BackendStatus::Fallback(reason), _) => {
                Err(GenerationError::BackendUnavailable(reason.clone()))
            }
            (BackendStatus::Ready { .. }, None) => {
                Err(GenerationError::BackendUnavailable(DegradationReason::MissingCredentials))
            }
        }
    }

    async fn open_backend(
        config: &AiConfig,
        resolver: &CredentialResolver,
    ) -> Result<(Box<dyn ReasoningBackend>, CredentialSource), DegradationReason> {
        if !config.enabled {
            return Err(DegradationReason::Disabled);
        }
        if !config.provider.eq_ignore_ascii_case("claude") {
            return Err(DegradationReason::UnknownProvider(config.provider.clone()));
        }

        let credential = resolver.resolve().ok_or(DegradationReason::MissingCredentials)?;
        let backend = build_backend(config, credential.secret.clone())?;

        backend
            .handshake()
            .await
            .map_err(|e| DegradationReason::HandshakeFailed(e.to_string()))?;

        Ok((backend, credential.source))
    }
}

async fn generate<T>(
    backend: &dyn ReasoningBackend,
    prompt: &str,
    parse: fn(&str) -> Result<T, ValidationError>,
) -> Result<T, GenerationError> {
    let text = backend.complete(prompt).await.map_err(|e| GenerationError::Backend(e.to_string()))?;
    Ok(parse(&text)?)
}

#[cfg(feature = "ai")]
fn build_backend(
    config: &AiConfig,
    secret: SecretValue,
) -> Result<Box<dyn ReasoningBackend>, DegradationReason> {
    let timeout = config.timeout_secs.map(Duration::from_secs);
    let mut backend = super::ClaudeBackend::new(secret, timeout)
        .map_err(|e| DegradationReason::HandshakeFailed(e.to_string()))?
        .with_max_tokens(config.max_tokens);

    if let Some(model) = &config.model {
        backend = backend.with_model(model.clone());
    }
    Ok(Box::new(backend))
}

#[cfg(not(feature = "ai"))]
fn build_backend(
    _config: &AiConfig,
    _secret: SecretValue,
) -> Result<Box<dyn ReasoningBackend>, DegradationReason> {
    Err(DegradationReason::NotCompiled)
}
