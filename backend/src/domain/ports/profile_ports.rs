//! Driving ports for user profile use-cases.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Error, ProfileDraft, UserId, UserProfile};

/// Query port for profile reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Fetch the caller's profile, falling back to an empty default.
    async fn fetch(&self, user_id: &UserId) -> Result<UserProfile, Error>;
}

/// Command port for profile updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Validate and persist the caller's profile; last write wins.
    async fn update(&self, user_id: UserId, draft: ProfileDraft) -> Result<UserProfile, Error>;
}

/// Fixture query implementation returning an empty default profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileQuery;

#[async_trait]
impl ProfileQuery for FixtureProfileQuery {
    async fn fetch(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        Ok(UserProfile::new_default(user_id.clone(), Utc::now()))
    }
}

/// Fixture command implementation that discards the update.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileCommand;

#[async_trait]
impl ProfileCommand for FixtureProfileCommand {
    async fn update(&self, user_id: UserId, draft: ProfileDraft) -> Result<UserProfile, Error> {
        let display_name = crate::domain::DisplayName::new(draft.display_name)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(UserProfile {
            user_id,
            display_name: Some(display_name),
            job_title: draft.job_title,
            company_name: draft.company_name,
            bio: draft.bio,
            updated_at: Utc::now(),
        })
    }
}
