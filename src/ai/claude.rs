//! Claude API integration.
//!
//! Implements [`ReasoningBackend`] on top of the Anthropic Messages API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::credentials::SecretValue;
use super::prompt::SYSTEM_PROMPT;
use super::ReasoningBackend;

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Claude API backend.
pub struct ClaudeBackend {
    client: Client,
    api_key: SecretValue,
    model: String,
    max_tokens: u32,
}

impl ClaudeBackend {
    /// Create a backend with the given key.
    ///
    /// `timeout` bounds each HTTP request; `None` waits indefinitely.
    pub fn new(api_key: SecretValue, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
        })
    }

    /// Use a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Cap response length.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", API_VERSION)
    }

    async fn request(&self, user_message: &str) -> anyhow::Result<String> {
        let request = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![Message { role: "user".to_string(), content: user_message.to_string() }],
        };

        let response = self
            .authorized(self.client.post(format!("{API_BASE}/messages")))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        let response: ClaudeResponse = response.json().await?;

        let text: String = response
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            anyhow::bail!("No response from Claude");
        }
        Ok(text)
    }
}

#[async_trait]
impl ReasoningBackend for ClaudeBackend {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending request to Claude"
        );
        self.request(prompt).await
    }

    fn name(&self) -> &str {
        "claude"
    }

    async fn handshake(&self) -> anyhow::Result<()> {
        let response =
            self.authorized(self.client.get(format!("{API_BASE}/models"))).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("API returned {}", response.status());
        }
        Ok(())
    }
}

// API types

#[derive(Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_settings() {
        let backend = ClaudeBackend::new(SecretValue::new("sk-test"), Some(Duration::from_secs(5)))
            .unwrap()
            .with_model("claude-test")
            .with_max_tokens(512);

        assert_eq!(backend.name(), "claude");
        assert_eq!(backend.model, "claude-test");
        assert_eq!(backend.max_tokens, 512);
    }

    #[test]
    fn test_response_joins_text_blocks() {
        let json = r#"{"content": [
            {"type": "text", "text": "Which provider?"},
            {"type": "tool_use", "id": "x"},
            {"type": "text", "text": "Which roles?"}
        ]}"#;
        let response: ClaudeResponse = serde_json::from_str(json).unwrap();
        let texts: Vec<_> =
            response.content.iter().filter(|b| b.kind == "text").map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["Which provider?", "Which roles?"]);
    }
}
