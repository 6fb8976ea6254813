//! Shared domain types for Olivia.
//!
//! This crate contains the domain types used across the Olivia client:
//! chat turns, identities and profiles, completion request/response shapes,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
pub mod llm;
