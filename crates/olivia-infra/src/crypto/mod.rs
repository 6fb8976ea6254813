//! Cryptographic operations for Olivia.
//!
//! - `password`: Argon2id password hashing for local accounts

pub mod password;
