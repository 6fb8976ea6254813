//! Account and profile repository trait definitions.

use olivia_types::error::RepositoryError;
use olivia_types::identity::{Account, IdentityId, UserProfile};

/// Repository trait for account persistence and the signed-in identity.
///
/// Implementations live in olivia-infra (e.g., `SqliteAccountRepository`).
pub trait AccountRepository: Send + Sync {
    /// Create a new account. Fails with `Conflict` if the email is taken.
    fn create_account(
        &self,
        account: &Account,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &IdentityId,
    ) -> impl std::future::Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// Change an account's email. `NotFound` if the account is gone,
    /// `Conflict` if another account holds the email.
    fn update_email(
        &self,
        id: &IdentityId,
        email: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn update_password_hash(
        &self,
        id: &IdentityId,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn set_onboarding_complete(
        &self,
        id: &IdentityId,
        complete: bool,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn delete_account(
        &self,
        id: &IdentityId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The identity persisted as signed in, if any.
    fn signed_in(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<IdentityId>, RepositoryError>> + Send;

    /// Persist (or clear, with `None`) the signed-in identity.
    fn set_signed_in(
        &self,
        id: Option<&IdentityId>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Repository trait for user profiles.
pub trait ProfileRepository: Send + Sync {
    fn get_profile(
        &self,
        id: &IdentityId,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>, RepositoryError>> + Send;

    /// Insert or replace the profile for `profile.identity_id`.
    fn save_profile(
        &self,
        profile: &UserProfile,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn delete_profile(
        &self,
        id: &IdentityId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
