//! User profile domain service implementing the driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    ProfileCommand, ProfileQuery, ProfileRepository, ProfileRepositoryError,
};
use crate::domain::{DisplayName, Error, ProfileDraft, UserId, UserProfile};

/// Profile service: fetch-with-default and validated last-write-wins update.
#[derive(Clone)]
pub struct ProfileService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ProfileService<R> {
    /// Create a new service with the given repository and clock.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> ProfileService<R>
where
    R: ProfileRepository,
{
    fn map_repository_error(error: ProfileRepositoryError) -> Error {
        match error {
            ProfileRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("profile store unavailable: {message}"))
            }
            ProfileRepositoryError::Query { message } => {
                Error::internal(format!("profile store error: {message}"))
            }
        }
    }
}

#[async_trait]
impl<R> ProfileQuery for ProfileService<R>
where
    R: ProfileRepository,
{
    async fn fetch(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        let stored = self
            .repo
            .find_by_user_id(user_id)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(stored.unwrap_or_else(|| UserProfile::new_default(user_id.clone(), self.clock.utc())))
    }
}

#[async_trait]
impl<R> ProfileCommand for ProfileService<R>
where
    R: ProfileRepository,
{
    async fn update(&self, user_id: UserId, draft: ProfileDraft) -> Result<UserProfile, Error> {
        let ProfileDraft {
            display_name,
            job_title,
            company_name,
            bio,
        } = draft;
        let display_name = DisplayName::new(display_name).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "displayName" }))
        })?;

        let profile = UserProfile {
            user_id,
            display_name: Some(display_name),
            job_title,
            company_name,
            bio,
            updated_at: self.clock.utc(),
        };

        self.repo
            .save(&profile)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockProfileRepository;
    use chrono::Utc;
    use mockable::DefaultClock;

    fn service(repo: MockProfileRepository) -> ProfileService<MockProfileRepository> {
        ProfileService::new(Arc::new(repo), Arc::new(DefaultClock))
    }

    #[tokio::test]
    async fn fetch_returns_the_stored_profile() {
        let user_id = UserId::random();
        let stored = UserProfile {
            user_id: user_id.clone(),
            display_name: Some(DisplayName::new("Ada Lovelace").expect("display name")),
            job_title: Some("Analyst".to_owned()),
            company_name: None,
            bio: None,
            updated_at: Utc::now(),
        };
        let expected = stored.clone();

        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_user_id()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let fetched = service(repo).fetch(&user_id).await.expect("fetch succeeds");
        assert_eq!(fetched, expected);
    }

    #[tokio::test]
    async fn fetch_falls_back_to_an_empty_default() {
        let user_id = UserId::random();
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_user_id()
            .times(1)
            .return_once(|_| Ok(None));

        let fetched = service(repo).fetch(&user_id).await.expect("fetch succeeds");
        assert_eq!(fetched.user_id, user_id);
        assert!(fetched.display_name.is_none());
    }

    #[tokio::test]
    async fn update_rejects_invalid_display_names_without_saving() {
        let mut repo = MockProfileRepository::new();
        repo.expect_save().times(0);

        let error = service(repo)
            .update(
                UserId::random(),
                ProfileDraft {
                    display_name: "!".to_owned(),
                    job_title: None,
                    company_name: None,
                    bio: None,
                },
            )
            .await
            .expect_err("invalid display name");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn update_persists_the_validated_profile() {
        let user_id = UserId::random();
        let mut repo = MockProfileRepository::new();
        repo.expect_save()
            .withf(|profile: &UserProfile| {
                profile
                    .display_name
                    .as_ref()
                    .is_some_and(|name| name.as_ref() == "Ada Lovelace")
            })
            .times(1)
            .return_once(|_| Ok(()));

        let updated = service(repo)
            .update(
                user_id.clone(),
                ProfileDraft {
                    display_name: "Ada Lovelace".to_owned(),
                    job_title: Some("Analyst".to_owned()),
                    company_name: None,
                    bio: None,
                },
            )
            .await
            .expect("update succeeds");
        assert_eq!(updated.user_id, user_id);
    }
}
