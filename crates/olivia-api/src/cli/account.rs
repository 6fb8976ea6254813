//! Account maintenance: change email, change password, delete.
//!
//! Every action re-authenticates with the current password.

use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use olivia_infra::filesystem::remove_profile_photos;

use crate::state::AppState;

use super::auth::{prompt_email, prompt_password, require_identity};

pub async fn update_email(state: &AppState, new_email: Option<&str>, json: bool) -> Result<()> {
    require_identity(state).await?;

    let new_email = match new_email {
        Some(e) => e.to_string(),
        None => prompt_email("New email")?,
    };
    let current = prompt_password("Current password")?;

    let identity = state.accounts.update_email(&new_email, &current).await?;

    if json {
        println!("{}", serde_json::json!({"updated": true, "email": identity.email}));
    } else {
        println!(
            "  {} Email changed to {}",
            style("✓").green().bold(),
            style(&identity.email).cyan()
        );
    }
    Ok(())
}

pub async fn update_password(state: &AppState, json: bool) -> Result<()> {
    require_identity(state).await?;

    let current = prompt_password("Current password")?;
    let new_password = prompt_password("New password")?;
    let confirm = prompt_password("Confirm new password")?;
    if new_password != confirm {
        anyhow::bail!(olivia_types::error::AccountError::PasswordMismatch);
    }

    state.accounts.update_password(&new_password, &current).await?;

    if json {
        println!("{}", serde_json::json!({"updated": true}));
    } else {
        println!("  {} Password changed", style("✓").green().bold());
    }
    Ok(())
}

/// Delete the signed-in account after confirmation. Returns whether the
/// account was deleted.
pub async fn delete_account(state: &AppState, json: bool) -> Result<bool> {
    let identity = require_identity(state).await?;

    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Permanently delete {} and your whole conversation with Olivia?",
            style(&identity.email).red().bold()
        ))
        .default(false)
        .interact()?;
    if !confirmed {
        println!("  Cancelled.");
        return Ok(false);
    }

    let current = prompt_password("Current password")?;
    state.accounts.delete_account(&current).await?;
    if let Err(e) = remove_profile_photos(&state.data_dir, &identity.id).await {
        tracing::warn!(identity = %identity.id, error = %e, "Failed to remove profile photo");
    }

    if json {
        println!("{}", serde_json::json!({"deleted": true, "email": identity.email}));
    } else {
        println!("  {} Account deleted", style("✓").green().bold());
    }
    Ok(true)
}
