//! OpenAiCompletionClient -- [`CompletionClient`] over the OpenAI Chat
//! Completions API (or any endpoint speaking the same shape).
//!
//! One POST per call, `Authorization: Bearer <key>`, no retries. The API key
//! is wrapped in [`SecretString`] and only exposed while building the
//! request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use olivia_core::llm::client::CompletionClient;
use olivia_core::llm::plan::parse_reply;
use olivia_types::config::CompletionConfig;
use olivia_types::llm::{CompletionError, ResponseFormat, RoleText};

use super::types::{CONTENT_POINTER, ChatCompletionRequest, WireMessage};

/// Chat-completion client for OpenAI-compatible endpoints.
///
/// Deliberately has no `Debug` impl so the key cannot leak through
/// formatting.
pub struct OpenAiCompletionClient {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    format: ResponseFormat,
}

impl OpenAiCompletionClient {
    /// Build a client from configuration. `request_timeout_secs` bounds the
    /// whole round trip; a timeout surfaces as a transport error.
    pub fn new(api_key: SecretString, config: &CompletionConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CompletionError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            format: config.response_format,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }
}

impl CompletionClient for OpenAiCompletionClient {
    #[tracing::instrument(skip_all, fields(model = %self.model, turns = history.len()))]
    async fn complete(&self, system_prompt: &str, history: &[RoleText]) -> Result<String, CompletionError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(WireMessage::system(system_prompt));
        messages.extend(history.iter().map(WireMessage::from_role_text));

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Completion endpoint returned an error status");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| CompletionError::InvalidBody(e.to_string()))?;
        let content = json
            .pointer(CONTENT_POINTER)
            .and_then(serde_json::Value::as_str)
            .ok_or(CompletionError::MissingContent)?;

        parse_reply(content, self.format)
    }
}
