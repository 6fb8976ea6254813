//! Interactive chat screen.
//!
//! Renders the session transcript as it changes, shows a spinner while a
//! reply is pending, and handles slash commands. Entry point:
//! `loop_runner::run_chat`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod transcript;
