//! Chat Completions API wire types.
//!
//! Request-side structures only. Responses are navigated as
//! `serde_json::Value` so a body that is not JSON and a body that lacks
//! `choices[0].message.content` stay distinguishable.

use serde::Serialize;

use olivia_types::llm::{MessageRole, RoleText};

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> WireMessage<'a> {
    pub fn system(content: &'a str) -> Self {
        Self {
            role: MessageRole::System.as_str(),
            content,
        }
    }

    pub fn from_role_text(entry: &'a RoleText) -> Self {
        Self {
            role: entry.role.as_str(),
            content: &entry.content,
        }
    }
}

/// JSON pointer to the reply text in a response body.
pub const CONTENT_POINTER: &str = "/choices/0/message/content";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_system_first() {
        let history = vec![
            RoleText::new(MessageRole::User, "hi"),
            RoleText::new(MessageRole::Assistant, "hello!"),
        ];
        let mut messages = vec![WireMessage::system("Be kind.")];
        messages.extend(history.iter().map(WireMessage::from_role_text));
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages,
            temperature: 0.7,
            max_tokens: 500,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "Be kind."},
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello!"},
                ],
                "temperature": 0.7,
                "max_tokens": 500,
            })
        );
    }
}
