//! Driven port for prompt catalogue persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::{
    LikeState, PromptComment, PromptDetail, PromptSearchFilter, PromptSummary, PromptTemplate,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by prompt repository adapters.
    pub enum PromptRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "prompt store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "prompt store query failed: {message}",
    }
}

/// Port for prompt template storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromptRepository: Send + Sync {
    /// Search templates, newest first, with like/comment counts attached.
    async fn search(
        &self,
        filter: &PromptSearchFilter,
        page: &PageRequest,
    ) -> Result<Page<PromptSummary>, PromptRepositoryError>;

    /// Fetch one template with its comments and viewer-specific like state.
    ///
    /// Returns `None` when the template does not exist.
    async fn find_detail<'a>(
        &self,
        id: Uuid,
        viewer: Option<&'a UserId>,
    ) -> Result<Option<PromptDetail>, PromptRepositoryError>;

    /// Persist a freshly created template.
    async fn insert(&self, template: &PromptTemplate) -> Result<(), PromptRepositoryError>;

    /// Flip the user's like on a template.
    ///
    /// Returns `None` when the template does not exist; otherwise the new
    /// like state. The flip must be atomic so repeated toggles never leave
    /// duplicate rows.
    async fn toggle_like(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<LikeState>, PromptRepositoryError>;

    /// Persist a comment; returns `false` when the template does not exist.
    async fn add_comment(&self, comment: &PromptComment) -> Result<bool, PromptRepositoryError>;
}

/// Fixture implementation backed by no storage at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePromptRepository;

#[async_trait]
impl PromptRepository for FixturePromptRepository {
    async fn search(
        &self,
        _filter: &PromptSearchFilter,
        _page: &PageRequest,
    ) -> Result<Page<PromptSummary>, PromptRepositoryError> {
        Ok(Page::empty())
    }

    async fn find_detail<'a>(
        &self,
        _id: Uuid,
        _viewer: Option<&'a UserId>,
    ) -> Result<Option<PromptDetail>, PromptRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _template: &PromptTemplate) -> Result<(), PromptRepositoryError> {
        Ok(())
    }

    async fn toggle_like(
        &self,
        _id: Uuid,
        _user_id: &UserId,
    ) -> Result<Option<LikeState>, PromptRepositoryError> {
        Ok(None)
    }

    async fn add_comment(&self, _comment: &PromptComment) -> Result<bool, PromptRepositoryError> {
        Ok(false)
    }
}
