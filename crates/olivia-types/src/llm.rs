//! Completion request/response types.
//!
//! These types model the data shapes exchanged with the remote
//! chat-completion service: role-tagged history entries, the structured
//! coaching-plan reply, and the error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a message in a completion conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single role-tagged history entry sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleText {
    pub role: MessageRole,
    pub content: String,
}

impl RoleText {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// How the completion's content is turned into reply text.
///
/// Chosen by configuration; never detected from the response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// The content is the reply, trimmed of surrounding whitespace.
    #[default]
    Plain,
    /// The content is a JSON [`CoachingPlan`] rendered to text.
    Structured,
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFormat::Plain => write!(f, "plain"),
            ResponseFormat::Structured => write!(f, "structured"),
        }
    }
}

/// One actionable step of a structured coaching reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachingStep {
    pub step: u32,
    pub action: String,
    pub example: String,
}

/// Structured reply shape: `{ steps: [...], encouragement }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachingPlan {
    pub steps: Vec<CoachingStep>,
    pub encouragement: String,
}

/// Errors from one completion round trip.
///
/// None of these are retried by the client; the caller decides.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error("response has no choices[0].message.content")]
    MissingContent,

    #[error("structured reply does not match the expected shape: {0}")]
    MalformedPlan(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_name_matches_serde() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_role_text_serializes_lowercase_role() {
        let entry = RoleText::new(MessageRole::Assistant, "hey");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hey"}"#);
    }

    #[test]
    fn test_response_format_default_is_plain() {
        assert_eq!(ResponseFormat::default(), ResponseFormat::Plain);
        let parsed: ResponseFormat = serde_json::from_str("\"structured\"").unwrap();
        assert_eq!(parsed, ResponseFormat::Structured);
    }

    #[test]
    fn test_coaching_plan_deserialize() {
        let json = r#"{"steps":[{"step":1,"action":"Ask","example":"Hi?"}],"encouragement":"Go"}"#;
        let plan: CoachingPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].step, 1);
        assert_eq!(plan.encouragement, "Go");
    }

    #[test]
    fn test_completion_error_display() {
        let err = CompletionError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }
}
