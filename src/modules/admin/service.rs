use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use aress_backend::{IdentityStore, ProfileStore};
use aress_core::AppError;
use aress_models::{SweepReport, UserId};
use aress_observability::{
    CleanupOutcome, DeletionOutcome, track_profile_cleanup, track_user_deletion,
};

use crate::modules::admin::cleanup::CleanupQueue;
use crate::state::AppState;

pub const PROFILE_CLEANUP_SCHEDULED: &str =
    "User identity was deleted but the profile record could not be removed; cleanup has been scheduled";
pub const PROFILE_CLEANUP_PENDING: &str =
    "User identity was deleted but the profile record could not be removed; run the orphan sweep to remove it";

/// Removes a user: first the identity, then the profile.
///
/// There is no transaction across the two stores. If the identity delete
/// fails nothing else is touched. If the profile delete fails the id is
/// handed to the cleanup queue and the caller still gets an error.
pub struct DeleteUser {
    identities: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileStore>,
    cleanup: CleanupQueue,
}

impl DeleteUser {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        profiles: Arc<dyn ProfileStore>,
        cleanup: CleanupQueue,
    ) -> Self {
        Self {
            identities,
            profiles,
            cleanup,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.identities.clone(),
            state.profiles.clone(),
            state.cleanup.clone(),
        )
    }

    #[instrument(skip(self), fields(target = %target))]
    pub async fn execute(&self, target: UserId) -> Result<(), AppError> {
        if let Err(e) = self.identities.delete_identity(target).await {
            if e.is_not_found() {
                info!("Target identity does not exist; profile left untouched");
            } else {
                warn!(error = %e, "Identity deletion failed; profile left untouched");
            }
            track_user_deletion(DeletionOutcome::Failed);
            return Err(e.into());
        }

        match self.profiles.delete_profile(target).await {
            Ok(true) => {
                info!("User deleted");
                track_user_deletion(DeletionOutcome::Deleted);
                Ok(())
            }
            Ok(false) => {
                warn!("Identity deleted but no profile row existed");
                track_user_deletion(DeletionOutcome::Deleted);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Profile deletion failed after identity was removed");
                track_user_deletion(DeletionOutcome::Partial);
                let message = if self.cleanup.schedule(target) {
                    PROFILE_CLEANUP_SCHEDULED
                } else {
                    PROFILE_CLEANUP_PENDING
                };
                Err(AppError::upstream(message))
            }
        }
    }
}

/// Deletes every profile whose identity no longer exists.
///
/// Profiles whose identity lookup or removal fails are reported in
/// [`SweepReport::failed`] and left for the next run.
#[instrument(skip_all)]
pub async fn sweep_orphans(
    identities: &dyn IdentityStore,
    profiles: &dyn ProfileStore,
) -> Result<SweepReport, AppError> {
    let all = profiles.list_profiles().await?;
    let mut report = SweepReport {
        scanned: all.len(),
        ..SweepReport::default()
    };

    for profile in all {
        let id = profile.id;
        match identities.get_identity(id).await {
            Ok(Some(_)) => {}
            Ok(None) => match profiles.delete_profile(id).await {
                Ok(_) => {
                    info!(user_id = %id, "Removed orphaned profile");
                    track_profile_cleanup(CleanupOutcome::Swept);
                    report.removed.push(id);
                }
                Err(e) => {
                    warn!(user_id = %id, error = %e, "Failed to remove orphaned profile");
                    report.failed.push(id);
                }
            },
            Err(e) => {
                warn!(user_id = %id, error = %e, "Failed to look up identity");
                report.failed.push(id);
            }
        }
    }

    info!(
        scanned = report.scanned,
        removed = report.removed.len(),
        failed = report.failed.len(),
        "Orphan sweep finished"
    );

    Ok(report)
}
