//! Sign up, sign in, and sign out.

use anyhow::Result;
use console::style;
use dialoguer::{Input, Password, Select};

use olivia_core::identity::gate::IdentityGate;
use olivia_types::error::AccountError;
use olivia_types::identity::Identity;

use crate::state::AppState;

use super::splash::spinner;

/// The signed-in identity, or an error telling the user how to sign in.
pub async fn require_identity(state: &AppState) -> Result<Identity> {
    state
        .accounts
        .current_identity()
        .await
        .ok_or_else(|| anyhow::anyhow!("Not signed in. Run `olivia login` or `olivia signup` first."))
}

/// The auth screen of the app flow. Returns `false` when the user quits.
pub async fn auth_screen(state: &AppState) -> Result<bool> {
    let items = ["Sign in", "Create account", "Quit"];
    loop {
        let selection = Select::new()
            .with_prompt("Welcome to Olivia AI")
            .items(&items)
            .default(0)
            .interact()?;

        let outcome = match selection {
            0 => sign_in_prompt(state).await,
            1 => sign_up_prompt(state).await,
            _ => return Ok(false),
        };

        match outcome {
            Ok(identity) => {
                print_signed_in(&identity);
                return Ok(true);
            }
            Err(e) => match e.downcast_ref::<AccountError>() {
                Some(account_err) => print_account_error(account_err),
                None => return Err(e),
            },
        }
    }
}

pub async fn signup(state: &AppState, json: bool) -> Result<()> {
    let identity = sign_up_prompt(state).await?;
    if json {
        println!("{}", serde_json::json!({"signed_in": true, "email": identity.email}));
    } else {
        print_signed_in(&identity);
    }
    Ok(())
}

pub async fn login(state: &AppState, json: bool) -> Result<()> {
    let identity = sign_in_prompt(state).await?;
    if json {
        println!("{}", serde_json::json!({"signed_in": true, "email": identity.email}));
    } else {
        print_signed_in(&identity);
    }
    Ok(())
}

pub async fn logout(state: &AppState, json: bool) -> Result<()> {
    state.accounts.sign_out().await?;
    if json {
        println!("{}", serde_json::json!({"signed_in": false}));
    } else {
        println!("  {} Signed out", style("✓").green().bold());
    }
    Ok(())
}

async fn sign_in_prompt(state: &AppState) -> Result<Identity> {
    let email = prompt_email("Email")?;
    let password = prompt_password("Password")?;

    let spinner = spinner("signing in...");
    let result = state.accounts.sign_in(&email, &password).await;
    spinner.finish_and_clear();
    Ok(result?)
}

async fn sign_up_prompt(state: &AppState) -> Result<Identity> {
    let email = prompt_email("Email")?;
    let password = prompt_password("Password")?;
    let confirm = prompt_password("Confirm password")?;

    let spinner = spinner("creating account...");
    let result = state.accounts.sign_up(&email, &password, &confirm).await;
    spinner.finish_and_clear();
    Ok(result?)
}

pub(crate) fn prompt_email(prompt: &str) -> Result<String> {
    Ok(Input::<String>::new().with_prompt(prompt).interact_text()?)
}

pub(crate) fn prompt_password(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

fn print_signed_in(identity: &Identity) {
    println!();
    println!(
        "  {} Signed in as {}",
        style("✓").green().bold(),
        style(&identity.email).cyan()
    );
    println!();
}

pub(crate) fn print_account_error(err: &AccountError) {
    println!("\n  {} {err}\n", style("!").red().bold());
}
