//! Completion client implementations.
//!
//! Contains the OpenAI-compatible implementation of the
//! [`CompletionClient`](olivia_core::llm::client::CompletionClient) trait
//! defined in `olivia-core`.

pub mod openai;
pub mod types;
