//! Profile management for the signed-in identity.

use tracing::info;

use olivia_types::error::AccountError;
use olivia_types::identity::{IdentityId, UserProfile};

use super::repository::ProfileRepository;

pub struct ProfileService<P> {
    profiles: P,
}

impl<P: ProfileRepository> ProfileService<P> {
    pub fn new(profiles: P) -> Self {
        Self { profiles }
    }

    /// The stored profile, or an empty one if none was saved yet.
    pub async fn get(&self, id: &IdentityId) -> Result<UserProfile, AccountError> {
        Ok(self
            .profiles
            .get_profile(id)
            .await?
            .unwrap_or_else(|| UserProfile::empty(*id)))
    }

    pub async fn set_name(&self, id: &IdentityId, name: &str) -> Result<UserProfile, AccountError> {
        let mut profile = self.get(id).await?;
        profile.name = name.trim().to_string();
        self.profiles.save_profile(&profile).await?;
        info!(identity = %id, "Profile name updated");
        Ok(profile)
    }

    /// Record the location of an already stored profile photo.
    pub async fn set_photo(
        &self,
        id: &IdentityId,
        stored_path: &str,
    ) -> Result<UserProfile, AccountError> {
        let mut profile = self.get(id).await?;
        profile.profile_image_path = Some(stored_path.to_string());
        self.profiles.save_profile(&profile).await?;
        info!(identity = %id, path = stored_path, "Profile photo updated");
        Ok(profile)
    }
}
