//! Driven port for user profile persistence.

use async_trait::async_trait;

use crate::domain::{UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile store query failed: {message}",
    }
}

/// Port for user profile storage.
///
/// Profiles are single-row-per-user with last-write-wins semantics; there is
/// no cross-row invariant and therefore no versioning machinery here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile for a user, if one has been saved.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError>;

    /// Insert or overwrite the user's profile row.
    async fn save(&self, profile: &UserProfile) -> Result<(), ProfileRepositoryError>;
}

/// Fixture implementation backed by no storage at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileRepository;

#[async_trait]
impl ProfileRepository for FixtureProfileRepository {
    async fn find_by_user_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        Ok(None)
    }

    async fn save(&self, _profile: &UserProfile) -> Result<(), ProfileRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn fixture_repository_round_trip_is_a_no_op() {
        let repo = FixtureProfileRepository;
        let user_id = UserId::random();

        repo.save(&UserProfile::new_default(user_id.clone(), Utc::now()))
            .await
            .expect("fixture save");
        let fetched = repo.find_by_user_id(&user_id).await.expect("fixture find");
        assert!(fetched.is_none());
    }
}
