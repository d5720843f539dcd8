use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use aress_backend::{GoTrueClient, IdentityStore, PgProfileStore, ProfileStore};
use aress_config::{BackendConfig, CleanupConfig, CorsConfig, DatabaseConfig, JwtConfig};
use aress_observability::PrometheusHandle;

use crate::modules::admin::cleanup::CleanupQueue;

#[derive(Clone)]
pub struct AppState {
    pub identities: Arc<dyn IdentityStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub cleanup: CleanupQueue,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("identities", &self.identities)
            .field("profiles", &self.profiles)
            .field("jwt_config", &self.jwt_config)
            .field("cors_config", &self.cors_config)
            .field("cleanup", &self.cleanup)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// State over the given stores, with default configuration and a running
    /// cleanup worker. Must be called inside a tokio runtime.
    pub fn new(identities: Arc<dyn IdentityStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        let cleanup = CleanupQueue::spawn(profiles.clone(), CleanupConfig::default());
        Self {
            identities,
            profiles,
            jwt_config: JwtConfig::default(),
            cors_config: CorsConfig::default(),
            cleanup,
            metrics: None,
        }
    }
}

/// Builds the production state: the GoTrue client, the Postgres pool and the
/// cleanup worker.
pub async fn init_app_state(metrics: Option<PrometheusHandle>) -> anyhow::Result<AppState> {
    let backend_config = BackendConfig::from_env()?;
    let database_config = DatabaseConfig::from_env()?;

    let identities: Arc<dyn IdentityStore> = Arc::new(GoTrueClient::new(&backend_config)?);

    let store = PgProfileStore::connect(&database_config)
        .await
        .context("Failed to connect to database")?;

    if database_config.run_migrations {
        sqlx::migrate!()
            .run(store.pool())
            .await
            .context("Failed to run migrations")?;
        info!("Database migrations applied");
    }

    let profiles: Arc<dyn ProfileStore> = Arc::new(store);
    let cleanup = CleanupQueue::spawn(profiles.clone(), CleanupConfig::from_env());

    Ok(AppState {
        identities,
        profiles,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        cleanup,
        metrics,
    })
}
