//! CLI command definitions for the `olivia` binary.
//!
//! With no subcommand the binary runs the full app flow (splash, identity
//! gate, onboarding or auth, chat). Subcommands jump straight to a screen
//! or perform a single account action.

pub mod account;
pub mod app;
pub mod auth;
pub mod chat;
pub mod onboarding;
pub mod profile;
pub mod settings;
pub mod splash;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Olivia, your AI dating coach, in the terminal.
#[derive(Parser)]
#[command(name = "olivia", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in.
    #[command(alias = "register")]
    Signup,

    /// Sign in to an existing account.
    #[command(alias = "signin")]
    Login,

    /// Sign out. Your conversation stays stored.
    #[command(alias = "signout")]
    Logout,

    /// Walk through the onboarding pages.
    Onboarding,

    /// Chat with Olivia.
    Chat {
        /// Keep this conversation in memory only; nothing is stored.
        #[arg(long)]
        ephemeral: bool,
    },

    /// Print the stored conversation.
    History,

    /// Show or edit your profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Change account email or password, or delete the account.
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Show the settings screen.
    Settings,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show your profile.
    Show,
    /// Update your name and/or photo.
    Set {
        /// Display name.
        #[arg(long)]
        name: Option<String>,
        /// Path to an image to use as profile photo.
        #[arg(long)]
        photo: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Change the account email.
    Email {
        /// New email address (prompted if omitted).
        new_email: Option<String>,
    },
    /// Change the account password.
    Password,
    /// Permanently delete the account and its conversation.
    Delete,
}
