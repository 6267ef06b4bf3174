//! PostgreSQL-backed `PromptRepository` implementation using Diesel.
//!
//! Reads that combine templates with their like/comment counts run inside a
//! transaction so every SELECT observes one MVCC snapshot. The like toggle
//! is delete-then-insert inside a transaction, which keeps the
//! `(prompt_id, user_id)` pair unique under concurrent toggles.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{PromptRepository, PromptRepositoryError};
use crate::domain::{
    LikeState, PromptComment, PromptDetail, PromptSearchFilter, PromptSummary, PromptTemplate,
    UserId,
};

use super::diesel_helpers::{map_diesel_error_with, map_pool_error_with};
use super::models::{
    NewPromptCommentRow, NewPromptLikeRow, NewPromptTemplateRow, PromptCommentRow,
    PromptTemplateRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{prompt_comments, prompt_likes, prompt_templates};

/// Diesel-backed implementation of the prompt repository port.
#[derive(Clone)]
pub struct DieselPromptRepository {
    pool: DbPool,
}

impl DieselPromptRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PromptRepositoryError {
    map_pool_error_with(error, PromptRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PromptRepositoryError {
    map_diesel_error_with(
        error,
        PromptRepositoryError::query,
        PromptRepositoryError::connection,
    )
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn count_to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn row_to_template(row: PromptTemplateRow) -> PromptTemplate {
    PromptTemplate {
        id: row.id,
        author_id: UserId::from_uuid(row.author_id),
        title: row.title,
        description: row.description,
        content: row.content,
        category: row.category,
        language: row.language,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_comment(row: PromptCommentRow) -> PromptComment {
    PromptComment {
        id: row.id,
        prompt_id: row.prompt_id,
        author_id: UserId::from_uuid(row.user_id),
        body: row.body,
        created_at: row.created_at,
    }
}

/// Count rows per template id for the given grouped pairs.
fn counts_by_id(pairs: Vec<(Uuid, i64)>) -> HashMap<Uuid, u64> {
    pairs
        .into_iter()
        .map(|(id, count)| (id, count_to_u64(count)))
        .collect()
}

#[async_trait]
impl PromptRepository for DieselPromptRepository {
    async fn search(
        &self,
        filter: &PromptSearchFilter,
        page: &PageRequest,
    ) -> Result<Page<PromptSummary>, PromptRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let filter = filter.clone();
        let offset = clamp_to_i64(page.offset());
        let fetch = clamp_to_i64(u64::from(page.limit()) + 1);

        let (rows, like_counts, comment_counts) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let mut query = prompt_templates::table.into_boxed();
                    if let Some(keyword) = filter.query.as_ref() {
                        let pattern = format!("%{keyword}%");
                        query = query.filter(
                            prompt_templates::title
                                .ilike(pattern.clone())
                                .nullable()
                                .or(prompt_templates::description.ilike(pattern)),
                        );
                    }
                    if let Some(category) = filter.category.as_ref() {
                        query = query.filter(prompt_templates::category.eq(category.clone()));
                    }
                    if let Some(language) = filter.language.as_ref() {
                        query = query.filter(prompt_templates::language.eq(language.clone()));
                    }

                    let rows: Vec<PromptTemplateRow> = query
                        .select(PromptTemplateRow::as_select())
                        .order_by((prompt_templates::created_at.desc(), prompt_templates::id))
                        .offset(offset)
                        .limit(fetch)
                        .load(conn)
                        .await?;

                    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
                    let like_counts: Vec<(Uuid, i64)> = prompt_likes::table
                        .filter(prompt_likes::prompt_id.eq_any(ids.clone()))
                        .group_by(prompt_likes::prompt_id)
                        .select((prompt_likes::prompt_id, diesel::dsl::count_star()))
                        .load(conn)
                        .await?;
                    let comment_counts: Vec<(Uuid, i64)> = prompt_comments::table
                        .filter(prompt_comments::prompt_id.eq_any(ids))
                        .group_by(prompt_comments::prompt_id)
                        .select((prompt_comments::prompt_id, diesel::dsl::count_star()))
                        .load(conn)
                        .await?;

                    Ok((rows, like_counts, comment_counts))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let likes = counts_by_id(like_counts);
        let comments = counts_by_id(comment_counts);
        let summaries: Vec<PromptSummary> = rows
            .into_iter()
            .map(|row| PromptSummary {
                like_count: likes.get(&row.id).copied().unwrap_or(0),
                comment_count: comments.get(&row.id).copied().unwrap_or(0),
                id: row.id,
                title: row.title,
                description: row.description,
                category: row.category,
                language: row.language,
                created_at: row.created_at,
            })
            .collect();

        Ok(Page::from_items(summaries, page))
    }

    async fn find_detail<'a>(
        &self,
        id: Uuid,
        viewer: Option<&'a UserId>,
    ) -> Result<Option<PromptDetail>, PromptRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let viewer_uuid = viewer.map(|user| *user.as_uuid());

        let detail = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let template: Option<PromptTemplateRow> = prompt_templates::table
                        .filter(prompt_templates::id.eq(id))
                        .select(PromptTemplateRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(template) = template else {
                        return Ok(None);
                    };

                    let comments: Vec<PromptCommentRow> = prompt_comments::table
                        .filter(prompt_comments::prompt_id.eq(id))
                        .select(PromptCommentRow::as_select())
                        .order_by(prompt_comments::created_at)
                        .load(conn)
                        .await?;

                    let like_count: i64 = prompt_likes::table
                        .filter(prompt_likes::prompt_id.eq(id))
                        .count()
                        .get_result(conn)
                        .await?;

                    let viewer_has_liked = match viewer_uuid {
                        Some(user_id) => {
                            select(exists(
                                prompt_likes::table.filter(
                                    prompt_likes::prompt_id
                                        .eq(id)
                                        .and(prompt_likes::user_id.eq(user_id)),
                                ),
                            ))
                            .get_result(conn)
                            .await?
                        }
                        None => false,
                    };

                    Ok(Some((template, comments, like_count, viewer_has_liked)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(detail.map(|(template, comments, like_count, viewer_has_liked)| PromptDetail {
            template: row_to_template(template),
            like_count: count_to_u64(like_count),
            comments: comments.into_iter().map(row_to_comment).collect(),
            viewer_has_liked,
        }))
    }

    async fn insert(&self, template: &PromptTemplate) -> Result<(), PromptRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewPromptTemplateRow {
            id: template.id,
            author_id: *template.author_id.as_uuid(),
            title: template.title.as_str(),
            description: template.description.as_deref(),
            content: template.content.as_str(),
            category: template.category.as_deref(),
            language: template.language.as_str(),
            created_at: template.created_at,
            updated_at: template.updated_at,
        };

        diesel::insert_into(prompt_templates::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn toggle_like(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<LikeState>, PromptRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_uuid = *user_id.as_uuid();

        let state = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let template_exists: bool = select(exists(
                        prompt_templates::table.filter(prompt_templates::id.eq(id)),
                    ))
                    .get_result(conn)
                    .await?;
                    if !template_exists {
                        return Ok(None);
                    }

                    let removed = diesel::delete(
                        prompt_likes::table.filter(
                            prompt_likes::prompt_id
                                .eq(id)
                                .and(prompt_likes::user_id.eq(user_uuid)),
                        ),
                    )
                    .execute(conn)
                    .await?;

                    let liked = removed == 0;
                    if liked {
                        let row = NewPromptLikeRow {
                            prompt_id: id,
                            user_id: user_uuid,
                            created_at: chrono::Utc::now(),
                        };
                        diesel::insert_into(prompt_likes::table)
                            .values(&row)
                            .execute(conn)
                            .await?;
                    }

                    let like_count: i64 = prompt_likes::table
                        .filter(prompt_likes::prompt_id.eq(id))
                        .count()
                        .get_result(conn)
                        .await?;

                    Ok(Some((liked, like_count)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(state.map(|(liked, like_count)| LikeState {
            liked,
            like_count: count_to_u64(like_count),
        }))
    }

    async fn add_comment(&self, comment: &PromptComment) -> Result<bool, PromptRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let row = NewPromptCommentRow {
                    id: comment.id,
                    prompt_id: comment.prompt_id,
                    user_id: *comment.author_id.as_uuid(),
                    body: comment.body.as_str(),
                    created_at: comment.created_at,
                };

                let template_exists: bool = select(exists(
                    prompt_templates::table.filter(prompt_templates::id.eq(row.prompt_id)),
                ))
                .get_result(conn)
                .await?;
                if !template_exists {
                    return Ok(false);
                }

                diesel::insert_into(prompt_comments::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;

    #[test]
    fn counts_by_id_saturates_negative_values_to_zero() {
        let id = Uuid::new_v4();
        let counts = counts_by_id(vec![(id, -1)]);
        assert_eq!(counts.get(&id), Some(&0));
    }

    #[test]
    fn clamp_to_i64_handles_oversized_offsets() {
        assert_eq!(clamp_to_i64(u64::MAX), i64::MAX);
        assert_eq!(clamp_to_i64(42), 42);
    }

    #[test]
    fn rows_convert_into_domain_types() {
        let now = Utc::now();
        let row = PromptTemplateRow {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "Subject lines".to_owned(),
            description: None,
            content: "Write one for {topic}".to_owned(),
            category: Some("email".to_owned()),
            language: "en".to_owned(),
            created_at: now,
            updated_at: now,
        };
        let template = row_to_template(row);
        assert_eq!(template.category.as_deref(), Some("email"));

        let comment_row = PromptCommentRow {
            id: Uuid::new_v4(),
            prompt_id: template.id,
            user_id: Uuid::new_v4(),
            body: "nice".to_owned(),
            created_at: now,
        };
        let comment = row_to_comment(comment_row);
        assert_eq!(comment.prompt_id, template.id);
    }
}
