use tracing::{info, instrument};

use aress_backend::ProfileStore;
use aress_core::AppError;
use aress_models::{Identity, NewProfile, Profile, ProfileUpdate, UserId};

pub struct UserService;

impl UserService {
    pub async fn list_users(profiles: &dyn ProfileStore) -> Result<Vec<Profile>, AppError> {
        Ok(profiles.list_profiles().await?)
    }

    pub async fn get_user(profiles: &dyn ProfileStore, id: UserId) -> Result<Profile, AppError> {
        profiles
            .get_profile(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    #[instrument(skip(profiles, update), fields(user_id = %id))]
    pub async fn update_user(
        profiles: &dyn ProfileStore,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, AppError> {
        if update.is_empty() {
            return Err(AppError::bad_request("Nothing to update"));
        }

        let profile = profiles
            .update_profile(id, update)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(role = %profile.role, "Profile updated");
        Ok(profile)
    }

    /// Makes sure the caller has a profile. A new profile never starts as
    /// admin; an existing one keeps its role.
    #[instrument(skip_all, fields(user_id = %identity.id))]
    pub async fn sync_profile(
        profiles: &dyn ProfileStore,
        identity: &Identity,
    ) -> Result<Profile, AppError> {
        let profile = profiles
            .upsert_profile(NewProfile::from_identity(identity))
            .await?;
        Ok(profile)
    }
}
