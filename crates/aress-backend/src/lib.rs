//! # Aress Backend
//!
//! Clients for the two external stores the CRM depends on.
//!
//! - [`IdentityStore`]: the hosted auth service (accounts and sessions)
//! - [`ProfileStore`]: the `user_profiles` table (names and roles)
//!
//! Both are traits so the application receives explicitly constructed
//! handles instead of reaching for process-wide clients.
//!
//! | Trait | Production | Tests (`test-utils`) |
//! |-------|------------|----------------------|
//! | [`IdentityStore`] | [`GoTrueClient`] | `memory::InMemoryIdentityStore` |
//! | [`ProfileStore`] | [`PgProfileStore`] | `memory::InMemoryProfileStore` |
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use aress_backend::{GoTrueClient, PgProfileStore, IdentityStore, ProfileStore};
//!
//! let identities: Arc<dyn IdentityStore> = Arc::new(GoTrueClient::new(&backend_config)?);
//! let profiles: Arc<dyn ProfileStore> = Arc::new(PgProfileStore::connect(&db_config).await?);
//! ```

pub mod error;
pub mod gotrue;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::BackendError;
pub use gotrue::GoTrueClient;
pub use postgres::PgProfileStore;
pub use store::{IdentityStore, ProfileStore};
