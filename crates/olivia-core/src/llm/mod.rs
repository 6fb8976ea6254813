//! Completion client abstraction and reply parsing.

pub mod client;
pub mod plan;
