//! Business logic and repository trait definitions for Olivia.
//!
//! This crate defines the "ports" (store, completion client, account
//! repository traits) that the infrastructure layer implements, plus the
//! chat session controller and identity gate built on top of them. It
//! depends only on `olivia-types` -- never on `olivia-infra`.

pub mod chat;
pub mod identity;
pub mod llm;

#[cfg(test)]
mod test_support;
