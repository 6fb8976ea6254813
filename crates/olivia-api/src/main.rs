//! Olivia terminal client entry point.
//!
//! Binary name: `olivia`
//!
//! Parses CLI arguments, resolves the API key and data directory, opens the
//! database, then runs the app flow or dispatches to a single screen.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{AccountAction, Cli, Commands, ProfileAction};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,olivia=debug",
        _ => "trace",
    };
    olivia_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "olivia", &mut std::io::stdout());
        return Ok(());
    }

    // Fails fast when no API key is configured
    let state = AppState::init().await?;

    let result = dispatch(&state, &cli).await;

    state.db_pool.close().await;
    olivia_observe::tracing_setup::shutdown_tracing();
    result
}

async fn dispatch(state: &AppState, cli: &Cli) -> anyhow::Result<()> {
    let Some(command) = &cli.command else {
        return cli::app::run_app(state).await;
    };

    match command {
        Commands::Signup => cli::auth::signup(state, cli.json).await,
        Commands::Login => cli::auth::login(state, cli.json).await,
        Commands::Logout => cli::auth::logout(state, cli.json).await,
        Commands::Onboarding => {
            let identity = cli::auth::require_identity(state).await?;
            cli::onboarding::run_onboarding(state, &identity).await
        }
        Commands::Chat { ephemeral } => {
            let identity = cli::auth::require_identity(state).await?;
            cli::chat::loop_runner::run_chat(state, identity, *ephemeral)
                .await
                .map(|_| ())
        }
        Commands::History => cli::chat::transcript::print_history(state, cli.json).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show => cli::profile::show_profile(state, cli.json).await,
            ProfileAction::Set { name, photo } => {
                cli::profile::set_profile(state, name.as_deref(), photo.as_deref(), cli.json).await
            }
        },
        Commands::Account { action } => match action {
            AccountAction::Email { new_email } => {
                cli::account::update_email(state, new_email.as_deref(), cli.json).await
            }
            AccountAction::Password => cli::account::update_password(state, cli.json).await,
            AccountAction::Delete => cli::account::delete_account(state, cli.json).await.map(|_| ()),
        },
        Commands::Settings => cli::settings::settings_screen(state).await,
        Commands::Completions { .. } => Ok(()),
    }
}
