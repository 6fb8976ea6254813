//! Account management service.
//!
//! Local stand-in for a hosted identity provider: sign-up, sign-in,
//! sign-out, and the re-authenticated account changes (email, password,
//! deletion). Exactly one identity is signed in at a time; it is persisted
//! so the app reopens signed in.

use chrono::Utc;
use tracing::{info, warn};

use olivia_types::error::{AccountError, RepositoryError};
use olivia_types::identity::{Account, Identity, IdentityId, UserProfile};

use super::hasher::CredentialHasher;
use super::repository::{AccountRepository, ProfileRepository};
use crate::chat::store::TurnStore;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Service orchestrating the account lifecycle.
///
/// Generic over repository and hasher traits so olivia-core never depends
/// on olivia-infra. The turn store is needed so deleting an account also
/// removes its conversation.
pub struct AccountService<A, P, H, T> {
    accounts: A,
    profiles: P,
    hasher: H,
    turns: T,
}

impl<A, P, H, T> AccountService<A, P, H, T>
where
    A: AccountRepository,
    P: ProfileRepository,
    H: CredentialHasher,
    T: TurnStore,
{
    pub fn new(accounts: A, profiles: P, hasher: H, turns: T) -> Self {
        Self {
            accounts,
            profiles,
            hasher,
            turns,
        }
    }

    /// Create an account with an empty profile and sign it in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Identity, AccountError> {
        if password != confirm {
            return Err(AccountError::PasswordMismatch);
        }
        let email = normalize_email(email)?;
        check_password(password)?;

        if self.accounts.get_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken(email));
        }

        let account = Account {
            id: IdentityId::new(),
            email: email.clone(),
            password_hash: self.hasher.hash(password)?,
            onboarding_complete: false,
            created_at: Utc::now(),
        };
        self.accounts
            .create_account(&account)
            .await
            .map_err(|e| taken_or(e, &email))?;
        self.profiles
            .save_profile(&UserProfile::empty(account.id))
            .await?;
        self.accounts.set_signed_in(Some(&account.id)).await?;

        info!(identity = %account.id, "Account created");
        Ok(account.identity())
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AccountError> {
        let email = normalize_email(email).map_err(|_| AccountError::InvalidCredentials)?;
        let account = self
            .accounts
            .get_by_email(&email)
            .await?
            .filter(|a| self.hasher.verify(password, &a.password_hash))
            .ok_or(AccountError::InvalidCredentials)?;

        self.accounts.set_signed_in(Some(&account.id)).await?;
        info!(identity = %account.id, "Signed in");
        Ok(account.identity())
    }

    /// Clear the signed-in identity. Stored turns are kept.
    pub async fn sign_out(&self) -> Result<(), AccountError> {
        self.accounts.set_signed_in(None).await?;
        info!("Signed out");
        Ok(())
    }

    /// The signed-in account, if any.
    ///
    /// A sign-in record pointing at a missing account is cleared.
    pub async fn current_account(&self) -> Result<Option<Account>, AccountError> {
        let Some(id) = self.accounts.signed_in().await? else {
            return Ok(None);
        };
        match self.accounts.get_by_id(&id).await? {
            Some(account) => Ok(Some(account)),
            None => {
                warn!(identity = %id, "Signed-in account no longer exists, signing out");
                self.accounts.set_signed_in(None).await?;
                Ok(None)
            }
        }
    }

    pub async fn update_email(
        &self,
        new_email: &str,
        current_password: &str,
    ) -> Result<Identity, AccountError> {
        let account = self.reauthenticate(current_password).await?;
        let email = normalize_email(new_email)?;
        if email == account.email {
            return Ok(account.identity());
        }
        if self.accounts.get_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken(email));
        }

        self.accounts
            .update_email(&account.id, &email)
            .await
            .map_err(|e| taken_or(e, &email))?;
        info!(identity = %account.id, "Email updated");
        Ok(Identity {
            id: account.id,
            email,
        })
    }

    pub async fn update_password(
        &self,
        new_password: &str,
        current_password: &str,
    ) -> Result<(), AccountError> {
        let account = self.reauthenticate(current_password).await?;
        check_password(new_password)?;
        let hash = self.hasher.hash(new_password)?;
        self.accounts.update_password_hash(&account.id, &hash).await?;
        info!(identity = %account.id, "Password updated");
        Ok(())
    }

    /// Delete the signed-in account, its profile, and its turns, then sign out.
    pub async fn delete_account(&self, current_password: &str) -> Result<(), AccountError> {
        let account = self.reauthenticate(current_password).await?;

        self.accounts.set_signed_in(None).await?;
        let removed = self.turns.delete_all(&account.id).await?;
        self.profiles.delete_profile(&account.id).await?;
        self.accounts.delete_account(&account.id).await?;

        info!(identity = %account.id, turns = removed, "Account deleted");
        Ok(())
    }

    pub(crate) async fn set_onboarding(&self, id: &IdentityId) -> Result<(), AccountError> {
        self.accounts.set_onboarding_complete(id, true).await?;
        Ok(())
    }

    pub(crate) async fn onboarding_flag(&self, id: &IdentityId) -> Result<bool, AccountError> {
        Ok(self
            .accounts
            .get_by_id(id)
            .await?
            .is_some_and(|a| a.onboarding_complete))
    }

    async fn reauthenticate(&self, password: &str) -> Result<Account, AccountError> {
        let account = self
            .current_account()
            .await?
            .ok_or(AccountError::NotSignedIn)?;
        if !self.hasher.verify(password, &account.password_hash) {
            return Err(AccountError::InvalidCredentials);
        }
        Ok(account)
    }
}

/// Trim and lowercase an email, rejecting anything without a local part
/// and a domain around a single `@`.
pub fn normalize_email(raw: &str) -> Result<String, AccountError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace) =>
        {
            Ok(email)
        }
        _ => Err(AccountError::InvalidEmail(raw.trim().to_string())),
    }
}

fn check_password(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

fn taken_or(e: RepositoryError, email: &str) -> AccountError {
    match e {
        RepositoryError::Conflict(_) => AccountError::EmailTaken(email.to_string()),
        other => other.into(),
    }
}
