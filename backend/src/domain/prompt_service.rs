//! Prompt catalogue domain service implementing the driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{PromptCommand, PromptQuery, PromptRepository, PromptRepositoryError};
use crate::domain::{
    COMMENT_BODY_MAX, Error, LikeState, PROMPT_TITLE_MAX, PromptComment, PromptDetail, PromptDraft,
    PromptSearchFilter, PromptSummary, PromptTemplate, UserId,
};

/// Language tag applied when a draft does not specify one.
const DEFAULT_LANGUAGE: &str = "en";

/// Prompt catalogue service: search, detail, authoring, likes, comments.
#[derive(Clone)]
pub struct PromptService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> PromptService<R> {
    /// Create a new service with the given repository and clock.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> PromptService<R>
where
    R: PromptRepository,
{
    fn map_repository_error(error: PromptRepositoryError) -> Error {
        match error {
            PromptRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("prompt store unavailable: {message}"))
            }
            PromptRepositoryError::Query { message } => {
                Error::internal(format!("prompt store error: {message}"))
            }
        }
    }

    fn missing_error(id: Uuid) -> Error {
        Error::not_found(format!("prompt template {id} not found"))
    }

    fn field_error(field: &str, message: &str) -> Error {
        Error::invalid_request(message).with_details(json!({ "field": field }))
    }

    fn validate_draft(draft: PromptDraft) -> Result<PromptDraft, Error> {
        if draft.title.trim().is_empty() {
            return Err(Self::field_error("title", "title must not be empty"));
        }
        if draft.title.chars().count() > PROMPT_TITLE_MAX {
            return Err(Self::field_error(
                "title",
                "title exceeds the maximum length",
            ));
        }
        if draft.content.trim().is_empty() {
            return Err(Self::field_error("content", "content must not be empty"));
        }
        Ok(draft)
    }

    fn validate_comment_body(body: &str) -> Result<(), Error> {
        if body.trim().is_empty() {
            return Err(Self::field_error("body", "comment must not be empty"));
        }
        if body.chars().count() > COMMENT_BODY_MAX {
            return Err(Self::field_error(
                "body",
                "comment exceeds the maximum length",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<R> PromptQuery for PromptService<R>
where
    R: PromptRepository,
{
    async fn search(
        &self,
        filter: PromptSearchFilter,
        page: PageRequest,
    ) -> Result<Page<PromptSummary>, Error> {
        self.repo
            .search(&filter, &page)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn detail(&self, id: Uuid, viewer: Option<UserId>) -> Result<PromptDetail, Error> {
        self.repo
            .find_detail(id, viewer.as_ref())
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::missing_error(id))
    }
}

#[async_trait]
impl<R> PromptCommand for PromptService<R>
where
    R: PromptRepository,
{
    async fn create(
        &self,
        author_id: UserId,
        draft: PromptDraft,
    ) -> Result<PromptTemplate, Error> {
        let PromptDraft {
            title,
            description,
            content,
            category,
            language,
        } = Self::validate_draft(draft)?;

        let now = self.clock.utc();
        let template = PromptTemplate {
            id: Uuid::new_v4(),
            author_id,
            title,
            description,
            content,
            category,
            language: language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(&template)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(template)
    }

    async fn toggle_like(&self, id: Uuid, user_id: UserId) -> Result<LikeState, Error> {
        self.repo
            .toggle_like(id, &user_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::missing_error(id))
    }

    async fn add_comment(
        &self,
        id: Uuid,
        user_id: UserId,
        body: String,
    ) -> Result<PromptComment, Error> {
        Self::validate_comment_body(&body)?;

        let comment = PromptComment {
            id: Uuid::new_v4(),
            prompt_id: id,
            author_id: user_id,
            body,
            created_at: self.clock.utc(),
        };

        let stored = self
            .repo
            .add_comment(&comment)
            .await
            .map_err(Self::map_repository_error)?;
        if !stored {
            return Err(Self::missing_error(id));
        }
        Ok(comment)
    }
}
