//! Onboarding pager.

use anyhow::Result;
use console::style;
use dialoguer::Select;

use olivia_core::identity::gate::IdentityGate;
use olivia_core::identity::onboarding::{OnboardingFlow, ONBOARDING_PAGES};
use olivia_types::identity::Identity;

use crate::state::AppState;

const BAR_WIDTH: usize = 24;

/// Page through the onboarding screens, then mark onboarding complete.
pub async fn run_onboarding(state: &AppState, identity: &Identity) -> Result<()> {
    let mut flow = OnboardingFlow::new();

    loop {
        print_page(&flow);

        let items: &[&str] = if flow.is_last() {
            &["Get started"]
        } else {
            &["Next", "Skip"]
        };
        let selection = Select::new().items(items).default(0).interact()?;

        if flow.is_last() || selection == 1 {
            break;
        }
        flow.advance();
    }

    state.accounts.mark_onboarding_complete(&identity.id).await?;
    tracing::info!(identity = %identity.id, "Onboarding complete");
    Ok(())
}

fn print_page(flow: &OnboardingFlow) {
    let page = flow.page();
    println!();
    println!(
        "  {} {}",
        progress_bar(flow.progress()),
        style(format!("{}/{}", flow.index() + 1, ONBOARDING_PAGES.len())).dim()
    );
    println!();
    println!("  {}", style(page.title).magenta().bold());
    println!("  {}", page.description);
    println!();
}

fn progress_bar(fraction: f64) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "{}{}",
        style("━".repeat(filled)).magenta(),
        style("━".repeat(BAR_WIDTH - filled)).dim()
    )
}
