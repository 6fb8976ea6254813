//! Application configuration types.
//!
//! `AppConfig` represents `config.toml` in the data directory. Every field
//! has a default so a missing or partial file is valid. The API key is not
//! part of this file; it is injected from the environment at startup.

use serde::{Deserialize, Serialize};

use crate::llm::ResponseFormat;

/// Default system instruction for plain-text replies.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful dating coach AI.";

/// Default system instruction for structured (JSON) replies.
pub const DEFAULT_STRUCTURED_SYSTEM_PROMPT: &str = "You are a helpful dating coach AI. \
Reply only with a JSON object of the form \
{\"steps\":[{\"step\":1,\"action\":\"...\",\"example\":\"...\"}],\"encouragement\":\"...\"} \
with two to four concrete steps.";

/// Default greeting seeded into a new session.
pub const DEFAULT_WELCOME_MESSAGE: &str =
    "Hey, I'm Olivia, your dating coach. What's on your mind?";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Settings for the remote chat-completion service. Not user-controlled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub response_format: ResponseFormat,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            response_format: ResponseFormat::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Settings for the chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of most recent turns sent as history.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Overrides the format-dependent default system instruction.
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
}

fn default_history_window() -> usize {
    10
}

fn default_assistant_name() -> String {
    "Olivia".to_string()
}

fn default_welcome_message() -> String {
    DEFAULT_WELCOME_MESSAGE.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            system_prompt: None,
            assistant_name: default_assistant_name(),
            welcome_message: default_welcome_message(),
        }
    }
}

impl AppConfig {
    /// The system instruction in effect, given the configured response format.
    pub fn system_prompt(&self) -> &str {
        match (&self.chat.system_prompt, self.completion.response_format) {
            (Some(prompt), _) => prompt,
            (None, ResponseFormat::Plain) => DEFAULT_SYSTEM_PROMPT,
            (None, ResponseFormat::Structured) => DEFAULT_STRUCTURED_SYSTEM_PROMPT,
        }
    }
}
