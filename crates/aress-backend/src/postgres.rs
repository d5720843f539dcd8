//! `user_profiles` access over a Postgres pool.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::FromRow;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::instrument;
use uuid::Uuid;

use aress_config::DatabaseConfig;
use aress_models::{NewProfile, Profile, ProfileUpdate, Role, UserId};

use crate::error::BackendError;
use crate::store::ProfileStore;

const PROFILE_COLUMNS: &str = "id, name, email, role, created_at";

#[derive(Debug, Clone, FromRow)]
struct ProfileRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = BackendError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| BackendError::Decode(format!("profile {}: {e}", row.id)))?;

        Ok(Profile {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be reached.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, BackendError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(config.url.expose_secret())
            .await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, BackendError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Profile::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_profiles(&self) -> Result<Vec<Profile>, BackendError> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Profile::try_from).collect()
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    async fn upsert_profile(&self, profile: NewProfile) -> Result<Profile, BackendError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            INSERT INTO user_profiles (id, name, email, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
                SET name = EXCLUDED.name, email = EXCLUDED.email
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.id.into_inner())
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Profile::try_from(row)
    }

    #[instrument(skip(self, update), fields(user_id = %id))]
    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, BackendError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            UPDATE user_profiles
            SET name = COALESCE($2, name), role = COALESCE($3, role)
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id.into_inner())
        .bind(update.name.as_deref())
        .bind(update.role.map(|role| role.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Profile::try_from).transpose()
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete_profile(&self, id: UserId) -> Result<bool, BackendError> {
        let result = sqlx::query("DELETE FROM user_profiles WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
