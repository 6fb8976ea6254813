//! Identity gate and screen routing.
//!
//! Decides which screen the app shows: auth without an identity, onboarding
//! until it is marked complete, chat afterwards. A chat session can only be
//! opened with the identity this gate resolves.

use tracing::warn;

use olivia_types::error::AccountError;
use olivia_types::identity::{Identity, IdentityId, Screen};

use super::hasher::CredentialHasher;
use super::repository::{AccountRepository, ProfileRepository};
use super::service::AccountService;
use crate::chat::store::TurnStore;

/// The identity boundary the chat core depends on.
pub trait IdentityGate: Send + Sync {
    /// The signed-in identity. Lookup failures resolve to `None`.
    fn current_identity(&self) -> impl std::future::Future<Output = Option<Identity>> + Send;

    /// Whether `identity` has finished onboarding. Lookup failures resolve
    /// to `false` so the user sees onboarding again rather than nothing.
    fn onboarding_complete(
        &self,
        identity: &IdentityId,
    ) -> impl std::future::Future<Output = bool> + Send;

    fn mark_onboarding_complete(
        &self,
        identity: &IdentityId,
    ) -> impl std::future::Future<Output = Result<(), AccountError>> + Send;
}

impl<A, P, H, T> IdentityGate for AccountService<A, P, H, T>
where
    A: AccountRepository,
    P: ProfileRepository,
    H: CredentialHasher,
    T: TurnStore,
{
    async fn current_identity(&self) -> Option<Identity> {
        match self.current_account().await {
            Ok(account) => account.map(|a| a.identity()),
            Err(e) => {
                warn!(error = %e, "Failed to resolve signed-in identity");
                None
            }
        }
    }

    async fn onboarding_complete(&self, identity: &IdentityId) -> bool {
        self.onboarding_flag(identity).await.unwrap_or_else(|e| {
            warn!(identity = %identity, error = %e, "Failed to read onboarding state");
            false
        })
    }

    async fn mark_onboarding_complete(&self, identity: &IdentityId) -> Result<(), AccountError> {
        self.set_onboarding(identity).await
    }
}

/// Screen for a resolved gate state.
pub fn resolve_screen(identity: Option<&Identity>, onboarding_complete: bool) -> Screen {
    match identity {
        None => Screen::Auth,
        Some(_) if !onboarding_complete => Screen::Onboarding,
        Some(_) => Screen::Chat,
    }
}

/// Resolve the gate and pick the screen to show after the splash.
pub async fn route<G: IdentityGate>(gate: &G) -> (Screen, Option<Identity>) {
    let identity = gate.current_identity().await;
    let onboarded = match &identity {
        Some(identity) => gate.onboarding_complete(&identity.id).await,
        None => false,
    };
    (resolve_screen(identity.as_ref(), onboarded), identity)
}
