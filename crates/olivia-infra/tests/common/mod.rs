//! Scripted chat-completions endpoint for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use secrecy::SecretString;
use serde_json::{Value, json};

use olivia_infra::llm::openai::OpenAiCompletionClient;
use olivia_types::config::CompletionConfig;
use olivia_types::llm::ResponseFormat;

pub const TEST_KEY: &str = "sk-test-key";

/// One canned reply.
#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    /// A 200 with `content` at `choices[0].message.content`.
    pub fn content(content: &str) -> Self {
        Self::raw(
            StatusCode::OK,
            json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
    }

    pub fn raw(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What the server saw for one request.
#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct ServerState {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    captured: Arc<Mutex<Vec<Captured>>>,
}

pub struct StubServer {
    pub endpoint: String,
    state: ServerState,
}

impl StubServer {
    /// Serve `replies` in order; once exhausted, every request gets a plain "ok".
    pub async fn start(replies: Vec<Reply>) -> Self {
        let state = ServerState {
            replies: Arc::new(Mutex::new(replies.into())),
            captured: Arc::default(),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(handle))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: format!("http://{addr}/v1/chat/completions"),
            state,
        }
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.state.captured.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.captured.lock().unwrap().push(Captured {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });

    let reply = state
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Reply::content("ok"));
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (reply.status, reply.body)
}

/// An endpoint nothing is listening on.
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1/chat/completions")
}

pub fn client(endpoint: &str, format: ResponseFormat) -> OpenAiCompletionClient {
    client_with_timeout(endpoint, format, 10)
}

pub fn client_with_timeout(
    endpoint: &str,
    format: ResponseFormat,
    timeout_secs: u64,
) -> OpenAiCompletionClient {
    let config = CompletionConfig {
        endpoint: endpoint.to_string(),
        response_format: format,
        request_timeout_secs: timeout_secs,
        ..CompletionConfig::default()
    };
    OpenAiCompletionClient::new(SecretString::from(TEST_KEY), &config).unwrap()
}

/// Layer that records every span opened while it is installed, as
/// `name field=value ...`.
#[derive(Clone, Default)]
pub struct SpanLog(Arc<Mutex<Vec<String>>>);

impl SpanLog {
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for SpanLog {
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut line = attrs.metadata().name().to_string();
        attrs.record(&mut FieldWriter(&mut line));
        self.0.lock().unwrap().push(line);
    }
}

struct FieldWriter<'a>(&'a mut String);

impl tracing::field::Visit for FieldWriter<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        use std::fmt::Write;
        let _ = write!(self.0, " {}={:?}", field.name(), value);
    }
}
