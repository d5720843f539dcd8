//! Store interfaces used by the application layer.

use async_trait::async_trait;

use aress_models::{Identity, NewProfile, Profile, ProfileUpdate, UserId};

use crate::error::BackendError;

/// Accounts in the hosted auth service.
#[async_trait]
pub trait IdentityStore: Send + Sync + std::fmt::Debug {
    /// Resolves the identity behind a user's bearer token.
    ///
    /// Fails with [`BackendError::InvalidCredential`] when the service rejects
    /// the token.
    async fn verify_credential(&self, token: &str) -> Result<Identity, BackendError>;

    /// Looks up an identity by id with privileged credentials.
    async fn get_identity(&self, id: UserId) -> Result<Option<Identity>, BackendError>;

    /// Deletes an identity. Deleting an unknown id is an error, not a no-op.
    async fn delete_identity(&self, id: UserId) -> Result<(), BackendError>;
}

/// Rows of the `user_profiles` table.
#[async_trait]
pub trait ProfileStore: Send + Sync + std::fmt::Debug {
    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, BackendError>;

    /// All profiles, newest first.
    async fn list_profiles(&self) -> Result<Vec<Profile>, BackendError>;

    /// Inserts the profile, or refreshes name and email of an existing row
    /// while keeping its role.
    async fn upsert_profile(&self, profile: NewProfile) -> Result<Profile, BackendError>;

    /// Applies a partial update. `Ok(None)` when no row has that id.
    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, BackendError>;

    /// Removes the row. Returns whether a row existed.
    async fn delete_profile(&self, id: UserId) -> Result<bool, BackendError>;
}
