//! In-memory stores for tests and local development.
//!
//! Both stores count calls and can be told to fail, so tests can assert
//! that an operation never reached a store or observe partial failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use aress_models::{Identity, IdentityMetadata, NewProfile, Profile, ProfileUpdate, Role, UserId};

use crate::error::BackendError;
use crate::store::{IdentityStore, ProfileStore};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Takes one unit from a failure budget, returning whether to fail.
fn take_failure(budget: &AtomicUsize) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[derive(Debug, Default)]
struct IdentityState {
    identities: HashMap<UserId, Identity>,
    tokens: HashMap<String, UserId>,
}

#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    state: Mutex<IdentityState>,
    verify_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    failing_deletes: AtomicUsize,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an identity reachable through `token`.
    pub fn insert(&self, identity: Identity, token: impl Into<String>) {
        let mut state = lock(&self.state);
        state.tokens.insert(token.into(), identity.id);
        state.identities.insert(identity.id, identity);
    }

    /// Convenience for [`insert`](Self::insert) with a freshly built identity.
    pub fn add_user(&self, email: &str, name: &str, token: &str) -> Identity {
        let identity = Identity {
            id: UserId::new(),
            email: Some(email.to_string()),
            metadata: IdentityMetadata {
                name: Some(name.to_string()),
                role: None,
            },
            created_at: Some(Utc::now()),
        };
        self.insert(identity.clone(), token);
        identity
    }

    pub fn contains(&self, id: UserId) -> bool {
        lock(&self.state).identities.contains_key(&id)
    }

    /// Drops an identity behind the API's back, as an outside deletion would.
    pub fn remove(&self, id: UserId) -> Option<Identity> {
        let mut state = lock(&self.state);
        state.tokens.retain(|_, owner| *owner != id);
        state.identities.remove(&id)
    }

    pub fn len(&self) -> usize {
        lock(&self.state).identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Makes the next `n` deletions fail with an upstream error.
    pub fn fail_next_deletes(&self, n: usize) {
        self.failing_deletes.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn verify_credential(&self, token: &str) -> Result<Identity, BackendError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        let state = lock(&self.state);
        state
            .tokens
            .get(token)
            .and_then(|id| state.identities.get(id))
            .cloned()
            .ok_or(BackendError::InvalidCredential)
    }

    async fn get_identity(&self, id: UserId) -> Result<Option<Identity>, BackendError> {
        Ok(lock(&self.state).identities.get(&id).cloned())
    }

    async fn delete_identity(&self, id: UserId) -> Result<(), BackendError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.failing_deletes) {
            return Err(BackendError::Api {
                status: 500,
                message: "Database error deleting user".to_string(),
            });
        }

        let mut state = lock(&self.state);
        if state.identities.remove(&id).is_none() {
            return Err(BackendError::NotFound("User not found".to_string()));
        }
        state.tokens.retain(|_, owner| *owner != id);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<UserId, Profile>>,
    delete_calls: AtomicUsize,
    failing_deletes: AtomicUsize,
    failing_reads: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, profile: Profile) {
        lock(&self.profiles).insert(profile.id, profile);
    }

    /// Stores a profile for `identity` with the given role.
    pub fn add_for(&self, identity: &Identity, role: Role) -> Profile {
        let profile = Profile {
            id: identity.id,
            name: identity.display_name(),
            email: identity.email.clone().unwrap_or_default(),
            role,
            created_at: Utc::now(),
        };
        self.insert(profile.clone());
        profile
    }

    pub fn get(&self, id: UserId) -> Option<Profile> {
        lock(&self.profiles).get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.profiles).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Makes the next `n` deletions fail with a transport error.
    pub fn fail_next_deletes(&self, n: usize) {
        self.failing_deletes.store(n, Ordering::SeqCst);
    }

    /// Makes the next `n` single-profile reads fail with a transport error.
    pub fn fail_next_reads(&self, n: usize) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, BackendError> {
        if take_failure(&self.failing_reads) {
            return Err(BackendError::Request("connection reset".to_string()));
        }
        Ok(self.get(id))
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, BackendError> {
        let mut profiles: Vec<Profile> = lock(&self.profiles).values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    async fn upsert_profile(&self, profile: NewProfile) -> Result<Profile, BackendError> {
        let mut profiles = lock(&self.profiles);
        let stored = profiles
            .entry(profile.id)
            .and_modify(|existing| {
                existing.name = profile.name.clone();
                existing.email = profile.email.clone();
            })
            .or_insert_with(|| Profile {
                id: profile.id,
                name: profile.name.clone(),
                email: profile.email.clone(),
                role: profile.role,
                created_at: Utc::now(),
            });
        Ok(stored.clone())
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, BackendError> {
        let mut profiles = lock(&self.profiles);
        let Some(profile) = profiles.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            profile.name = name;
        }
        if let Some(role) = update.role {
            profile.role = role;
        }
        Ok(Some(profile.clone()))
    }

    async fn delete_profile(&self, id: UserId) -> Result<bool, BackendError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.failing_deletes) {
            return Err(BackendError::Request("connection reset".to_string()));
        }
        Ok(lock(&self.profiles).remove(&id).is_some())
    }
}
