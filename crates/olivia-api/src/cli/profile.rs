//! Profile CLI commands: show, set.

use std::path::Path;

use anyhow::Result;
use console::style;

use olivia_infra::filesystem::store_profile_photo;
use olivia_types::identity::UserProfile;

use crate::state::AppState;

use super::auth::require_identity;

pub async fn show_profile(state: &AppState, json: bool) -> Result<()> {
    let identity = require_identity(state).await?;
    let profile = state.profiles.get(&identity.id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "email": identity.email,
                "profile": profile,
            }))?
        );
        return Ok(());
    }

    println!();
    println!("  {}  {}", style("Email:").bold(), style(&identity.email).cyan());
    print_profile(&profile);
    println!();
    Ok(())
}

/// Update the profile name and/or photo.
///
/// The photo is copied into the data directory first; the profile only
/// records the stored copy.
pub async fn set_profile(
    state: &AppState,
    name: Option<&str>,
    photo: Option<&Path>,
    json: bool,
) -> Result<()> {
    if name.is_none() && photo.is_none() {
        anyhow::bail!("Nothing to update. Pass --name and/or --photo.");
    }

    let identity = require_identity(state).await?;
    let mut profile = state.profiles.get(&identity.id).await?;

    if let Some(name) = name {
        profile = state.profiles.set_name(&identity.id, name).await?;
    }
    if let Some(source) = photo {
        let stored = store_profile_photo(&state.data_dir, &identity.id, source)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to store photo {}: {e}", source.display()))?;
        profile = state
            .profiles
            .set_photo(&identity.id, &stored.to_string_lossy())
            .await?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!();
        println!("  {} Profile updated", style("✓").green().bold());
        print_profile(&profile);
        println!();
    }
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    let name = if profile.name.is_empty() {
        style("(not set)".to_string()).dim()
    } else {
        style(profile.name.clone()).cyan()
    };
    println!("  {}   {}", style("Name:").bold(), name);
    println!(
        "  {}  {}",
        style("Photo:").bold(),
        style(profile.profile_image_path.as_deref().unwrap_or("(none)")).dim()
    );
}
