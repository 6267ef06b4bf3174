//! Driving ports for the prompt catalogue use-cases.

use async_trait::async_trait;
use chrono::Utc;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::{
    Error, LikeState, PromptComment, PromptDetail, PromptDraft, PromptSearchFilter, PromptSummary,
    PromptTemplate, UserId,
};

/// Query port covering public catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromptQuery: Send + Sync {
    /// Search templates, newest first.
    async fn search(
        &self,
        filter: PromptSearchFilter,
        page: PageRequest,
    ) -> Result<Page<PromptSummary>, Error>;

    /// Fetch a template with comments; viewer-aware when a session exists.
    async fn detail(&self, id: Uuid, viewer: Option<UserId>) -> Result<PromptDetail, Error>;
}

/// Command port covering authenticated catalogue mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromptCommand: Send + Sync {
    /// Create a template authored by the caller.
    async fn create(&self, author_id: UserId, draft: PromptDraft)
    -> Result<PromptTemplate, Error>;

    /// Flip the caller's like on a template.
    async fn toggle_like(&self, id: Uuid, user_id: UserId) -> Result<LikeState, Error>;

    /// Add a comment by the caller.
    async fn add_comment(
        &self,
        id: Uuid,
        user_id: UserId,
        body: String,
    ) -> Result<PromptComment, Error>;
}

/// Fixture query implementation exposing an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePromptQuery;

#[async_trait]
impl PromptQuery for FixturePromptQuery {
    async fn search(
        &self,
        _filter: PromptSearchFilter,
        _page: PageRequest,
    ) -> Result<Page<PromptSummary>, Error> {
        Ok(Page::empty())
    }

    async fn detail(&self, id: Uuid, _viewer: Option<UserId>) -> Result<PromptDetail, Error> {
        Err(Error::not_found(format!("prompt template {id} not found")))
    }
}

/// Fixture command implementation that fabricates results without storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePromptCommand;

#[async_trait]
impl PromptCommand for FixturePromptCommand {
    async fn create(
        &self,
        author_id: UserId,
        draft: PromptDraft,
    ) -> Result<PromptTemplate, Error> {
        let now = Utc::now();
        let PromptDraft {
            title,
            description,
            content,
            category,
            language,
        } = draft;
        Ok(PromptTemplate {
            id: Uuid::new_v4(),
            author_id,
            title,
            description,
            content,
            category,
            language: language.unwrap_or_else(|| "en".to_owned()),
            created_at: now,
            updated_at: now,
        })
    }

    async fn toggle_like(&self, _id: Uuid, _user_id: UserId) -> Result<LikeState, Error> {
        Ok(LikeState {
            liked: true,
            like_count: 1,
        })
    }

    async fn add_comment(
        &self,
        id: Uuid,
        user_id: UserId,
        body: String,
    ) -> Result<PromptComment, Error> {
        Ok(PromptComment {
            id: Uuid::new_v4(),
            prompt_id: id,
            author_id: user_id,
            body,
            created_at: Utc::now(),
        })
    }
}
