//! Background removal of profiles left behind after their identity was
//! deleted.
//!
//! Each scheduled id gets its own task that retries the profile delete with
//! exponential backoff. Ids that exhaust their attempts are picked up by the
//! orphan sweep.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use aress_backend::ProfileStore;
use aress_config::CleanupConfig;
use aress_models::UserId;
use aress_observability::{CleanupOutcome, track_profile_cleanup};

/// Handle for scheduling profile cleanups. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CleanupQueue {
    sender: Option<mpsc::UnboundedSender<UserId>>,
}

impl CleanupQueue {
    /// Starts the worker. Must be called inside a tokio runtime.
    pub fn spawn(profiles: Arc<dyn ProfileStore>, config: CleanupConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(receiver, profiles, config));
        Self {
            sender: Some(sender),
        }
    }

    /// A queue that accepts nothing, for one-shot processes like the CLI.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Queues `id` for cleanup. Returns `false` if the id could not be queued.
    pub fn schedule(&self, id: UserId) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };

        match sender.send(id) {
            Ok(()) => {
                info!(user_id = %id, "Profile cleanup scheduled");
                true
            }
            Err(_) => {
                error!(user_id = %id, "Profile cleanup worker is gone");
                false
            }
        }
    }
}

async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<UserId>,
    profiles: Arc<dyn ProfileStore>,
    config: CleanupConfig,
) {
    while let Some(id) = receiver.recv().await {
        tokio::spawn(remove_with_retry(profiles.clone(), config.clone(), id));
    }
}

/// Deletes the profile of `id`, retrying on failure. Returns whether the
/// profile is gone.
pub async fn remove_with_retry(
    profiles: Arc<dyn ProfileStore>,
    config: CleanupConfig,
    id: UserId,
) -> bool {
    for attempt in 1..=config.max_attempts {
        tokio::time::sleep(config.delay_for(attempt)).await;

        match profiles.delete_profile(id).await {
            Ok(existed) => {
                info!(user_id = %id, attempt, existed, "Orphaned profile removed");
                track_profile_cleanup(CleanupOutcome::Removed);
                return true;
            }
            Err(e) if attempt < config.max_attempts => {
                warn!(user_id = %id, attempt, error = %e, "Profile cleanup failed, retrying");
                track_profile_cleanup(CleanupOutcome::Retrying);
            }
            Err(e) => {
                error!(user_id = %id, attempt, error = %e, "Profile cleanup gave up");
                track_profile_cleanup(CleanupOutcome::GaveUp);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use aress_backend::memory::{InMemoryIdentityStore, InMemoryProfileStore};
    use aress_models::Role;

    fn fast_config(max_attempts: u32) -> CleanupConfig {
        CleanupConfig {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    fn store_with_profile() -> (Arc<InMemoryProfileStore>, UserId) {
        let identity = InMemoryIdentityStore::new().add_user("rep@aress.com", "Rep", "t");
        let store = Arc::new(InMemoryProfileStore::new());
        store.add_for(&identity, Role::SalesRep);
        (store, identity.id)
    }

    #[tokio::test]
    async fn test_retries_until_removed() {
        let (store, id) = store_with_profile();
        store.fail_next_deletes(2);

        assert!(remove_with_retry(store.clone(), fast_config(5), id).await);
        assert!(store.get(id).is_none());
        assert_eq!(store.delete_calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let (store, id) = store_with_profile();
        store.fail_next_deletes(10);

        assert!(!remove_with_retry(store.clone(), fast_config(3), id).await);
        assert!(store.get(id).is_some());
        assert_eq!(store.delete_calls(), 3);
    }

    #[tokio::test]
    async fn test_queue_runs_cleanup_in_background() {
        let (store, id) = store_with_profile();
        store.fail_next_deletes(1);

        let queue = CleanupQueue::spawn(store.clone(), fast_config(5));
        assert!(queue.schedule(id));

        for _ in 0..100 {
            if store.get(id).is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_disabled_queue_rejects() {
        assert!(!CleanupQueue::disabled().schedule(UserId::new()));
    }
}
