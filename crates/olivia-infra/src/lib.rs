//! Infrastructure layer for Olivia.
//!
//! Contains implementations of the ports defined in `olivia-core`: SQLite
//! storage for accounts, profiles, and turn logs, an in-memory turn store,
//! the OpenAI-compatible completion client, Argon2 credential hashing, and
//! configuration and data-directory helpers.

pub mod config;
pub mod crypto;
pub mod filesystem;
pub mod llm;
pub mod memory;
pub mod sqlite;
