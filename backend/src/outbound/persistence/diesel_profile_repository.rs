//! PostgreSQL-backed `ProfileRepository` implementation using Diesel.
//!
//! Profiles are a single row per user with last-write-wins semantics, so the
//! save path is a plain upsert keyed on `user_id`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{DisplayName, UserId, UserProfile};

use super::diesel_helpers::{map_diesel_error_with, map_pool_error_with};
use super::models::{UserProfileRecord, UserProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_profiles;

/// Diesel-backed implementation of the profile repository port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    map_pool_error_with(error, ProfileRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    map_diesel_error_with(
        error,
        ProfileRepositoryError::query,
        ProfileRepositoryError::connection,
    )
}

fn row_to_profile(row: UserProfileRow) -> UserProfile {
    let display_name = row.display_name.and_then(|raw| match DisplayName::new(raw) {
        Ok(name) => Some(name),
        Err(error) => {
            // A stored name that fails today's validation is dropped rather
            // than surfaced as a hard error.
            tracing::warn!(user_id = %row.user_id, %error, "stored display name failed validation");
            None
        }
    });

    UserProfile {
        user_id: UserId::from_uuid(row.user_id),
        display_name,
        job_title: row.job_title,
        company_name: row.company_name,
        bio: row.bio,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserProfileRow> = user_profiles::table
            .filter(user_profiles::user_id.eq(user_id.as_uuid()))
            .select(UserProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_profile))
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let record = UserProfileRecord {
            user_id: *profile.user_id.as_uuid(),
            display_name: profile.display_name.as_ref().map(AsRef::as_ref),
            job_title: profile.job_title.as_deref(),
            company_name: profile.company_name.as_deref(),
            bio: profile.bio.as_deref(),
            updated_at: profile.updated_at,
        };

        diesel::insert_into(user_profiles::table)
            .values(&record)
            .on_conflict(user_profiles::user_id)
            .do_update()
            .set(&record)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
