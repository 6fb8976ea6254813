//! Settings screen.

use anyhow::Result;
use console::style;
use dialoguer::Select;

use olivia_core::identity::gate::IdentityGate;
use olivia_types::error::AccountError;

use crate::state::AppState;

use super::account;
use super::auth::print_account_error;

pub const PRIVACY_URL: &str = "https://olivia-ai.app/privacy";
pub const TERMS_URL: &str = "https://olivia-ai.app/terms";
pub const SUPPORT_URL: &str = "mailto:support@olivia-ai.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsAction {
    UpdateEmail,
    UpdatePassword,
    DeleteAccount,
    SignOut,
    Back,
}

const ACTIONS: [(SettingsAction, &str); 5] = [
    (SettingsAction::UpdateEmail, "Update email"),
    (SettingsAction::UpdatePassword, "Update password"),
    (SettingsAction::DeleteAccount, "Delete account"),
    (SettingsAction::SignOut, "Sign out"),
    (SettingsAction::Back, "Back"),
];

/// Show account details and run account actions until the user goes back,
/// signs out, or deletes the account.
pub async fn settings_screen(state: &AppState) -> Result<()> {
    loop {
        let Some(identity) = state.accounts.current_identity().await else {
            println!("  {}", style("Not signed in.").dim());
            return Ok(());
        };

        print_settings(&identity.email);

        let labels: Vec<&str> = ACTIONS.iter().map(|(_, label)| *label).collect();
        let selection = Select::new()
            .with_prompt("Settings")
            .items(&labels)
            .default(labels.len() - 1)
            .interact()?;

        let result = match ACTIONS[selection].0 {
            SettingsAction::UpdateEmail => account::update_email(state, None, false).await,
            SettingsAction::UpdatePassword => account::update_password(state, false).await,
            SettingsAction::DeleteAccount => match account::delete_account(state, false).await {
                Ok(true) => return Ok(()),
                other => other.map(|_| ()),
            },
            SettingsAction::SignOut => {
                state.accounts.sign_out().await?;
                println!("  {} Signed out", style("✓").green().bold());
                return Ok(());
            }
            SettingsAction::Back => return Ok(()),
        };

        if let Err(e) = result {
            match e.downcast_ref::<AccountError>() {
                Some(account_err) => print_account_error(account_err),
                None => return Err(e),
            }
        }
    }
}

fn print_settings(email: &str) {
    println!();
    println!("  {}", style("Settings").bold());
    println!();
    println!("  {}    {}", style("Account:").bold(), style(email).cyan());
    println!(
        "  {}    {}",
        style("Version:").bold(),
        style(env!("CARGO_PKG_VERSION")).dim()
    );
    println!();
    println!("  {}  {}", style("Privacy Policy").bold(), style(PRIVACY_URL).dim());
    println!("  {}    {}", style("Terms of Use").bold(), style(TERMS_URL).dim());
    println!("  {} {}", style("Contact Support").bold(), style(SUPPORT_URL).dim());
    println!();
}
