//! Splash screen shown while the identity gate resolves.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use olivia_core::identity::gate::route;
use olivia_types::identity::{Identity, Screen};

use crate::state::AppState;

/// A cyan spinner ticking on stderr with `message`.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Show the splash and resolve which screen comes next.
pub async fn show_splash(state: &AppState) -> (Screen, Option<Identity>) {
    println!();
    println!("  {}", style("Olivia AI").magenta().bold());
    println!("  {}", style("Your AI dating coach").dim());
    println!();

    let spinner = spinner("loading...");
    let (screen, identity) = route(state.accounts.as_ref()).await;
    spinner.finish_and_clear();

    tracing::debug!(%screen, signed_in = identity.is_some(), "Gate resolved");
    (screen, identity)
}
