//! The full app flow run when `olivia` is started without a subcommand.
//!
//! Splash, then the screen the identity gate picks. Leaving a screen goes
//! back through the gate, so signing out lands on auth and finishing
//! onboarding lands in chat.

use olivia_types::identity::Screen;

use crate::state::AppState;

use super::chat::loop_runner::{run_chat, ChatExit};
use super::splash::show_splash;
use super::{auth, onboarding, settings};

pub async fn run_app(state: &AppState) -> anyhow::Result<()> {
    loop {
        let (screen, identity) = show_splash(state).await;

        match (screen, identity) {
            (Screen::Auth, _) | (_, None) => {
                if !auth::auth_screen(state).await? {
                    return Ok(());
                }
            }
            (Screen::Onboarding, Some(identity)) => {
                onboarding::run_onboarding(state, &identity).await?;
            }
            (Screen::Chat, Some(identity)) | (Screen::Splash, Some(identity)) => {
                match run_chat(state, identity, false).await? {
                    ChatExit::Quit => return Ok(()),
                    ChatExit::Settings => settings::settings_screen(state).await?,
                }
            }
        }
    }
}
