//! PostgreSQL-backed `EntityRepository<Competitor>` implementation using Diesel.
//!
//! Same transactional shape as the company adapter: lock the owner's rows
//! with `FOR UPDATE`, verify the read-set snapshot, then apply the batch
//! all-or-nothing.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{EntityRepository, EntityRepositoryError, ExclusiveBatch};
use crate::domain::{Competitor, EntityId, OwnedEntity, UserId};

use super::diesel_helpers::{
    map_diesel_error_with, map_pool_error_with, read_set_matches, revision_from_db, revision_to_db,
};
use super::models::{CompetitorRow, CompetitorUpdate, NewCompetitorRow};
use super::pool::{DbPool, PoolError};
use super::schema::competitors;

/// Diesel-backed implementation of the competitor repository port.
#[derive(Clone)]
pub struct DieselCompetitorRepository {
    pool: DbPool,
}

impl DieselCompetitorRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug)]
enum ExclusiveTxnError {
    Diesel(diesel::result::Error),
    StaleSet,
    DuplicateId(Uuid),
}

impl From<diesel::result::Error> for ExclusiveTxnError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_pool_error(error: PoolError) -> EntityRepositoryError {
    map_pool_error_with(error, EntityRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EntityRepositoryError {
    map_diesel_error_with(
        error,
        EntityRepositoryError::query,
        EntityRepositoryError::connection,
    )
}

fn row_to_competitor(row: CompetitorRow) -> Competitor {
    Competitor {
        id: EntityId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.user_id),
        name: row.name,
        website: row.website,
        strengths: row.strengths,
        weaknesses: row.weaknesses,
        pricing_strategy: row.pricing_strategy,
        market_position: row.market_position,
        is_primary: row.is_primary,
        revision: revision_from_db(row.revision),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn insert_row(competitor: &Competitor) -> NewCompetitorRow<'_> {
    NewCompetitorRow {
        id: *competitor.id.as_uuid(),
        user_id: *competitor.owner_id.as_uuid(),
        name: competitor.name.as_str(),
        website: competitor.website.as_deref(),
        strengths: competitor.strengths.as_deref(),
        weaknesses: competitor.weaknesses.as_deref(),
        pricing_strategy: competitor.pricing_strategy.as_deref(),
        market_position: competitor.market_position.as_deref(),
        is_primary: competitor.is_primary,
        revision: revision_to_db(competitor.revision),
        created_at: competitor.created_at,
        updated_at: competitor.updated_at,
    }
}

fn update_row(competitor: &Competitor) -> CompetitorUpdate<'_> {
    CompetitorUpdate {
        name: competitor.name.as_str(),
        website: competitor.website.as_deref(),
        strengths: competitor.strengths.as_deref(),
        weaknesses: competitor.weaknesses.as_deref(),
        pricing_strategy: competitor.pricing_strategy.as_deref(),
        market_position: competitor.market_position.as_deref(),
        is_primary: competitor.is_primary,
        revision: revision_to_db(competitor.revision),
        updated_at: competitor.updated_at,
    }
}

#[async_trait]
impl EntityRepository<Competitor> for DieselCompetitorRepository {
    async fn list_for_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Competitor>, EntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CompetitorRow> = competitors::table
            .filter(competitors::user_id.eq(owner_id.as_uuid()))
            .select(CompetitorRow::as_select())
            .order_by((competitors::created_at, competitors::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_competitor).collect())
    }

    async fn find(&self, id: EntityId) -> Result<Option<Competitor>, EntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CompetitorRow> = competitors::table
            .filter(competitors::id.eq(id.as_uuid()))
            .select(CompetitorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_competitor))
    }

    async fn apply(
        &self,
        owner_id: &UserId,
        batch: ExclusiveBatch<Competitor>,
    ) -> Result<(), EntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_uuid = *owner_id.as_uuid();
        let batch_ref = &batch;

        let outcome = conn
            .transaction::<_, ExclusiveTxnError, _>(|conn| {
                async move {
                    let current: Vec<(Uuid, i32)> = competitors::table
                        .filter(competitors::user_id.eq(owner_uuid))
                        .select((competitors::id, competitors::revision))
                        .for_update()
                        .load(conn)
                        .await?;

                    if !read_set_matches(&batch_ref.read_set, &current) {
                        return Err(ExclusiveTxnError::StaleSet);
                    }

                    for write in &batch_ref.writes {
                        match write.expected_revision {
                            None => {
                                let row = insert_row(&write.entity);
                                diesel::insert_into(competitors::table)
                                    .values(&row)
                                    .execute(conn)
                                    .await
                                    .map_err(|err| match err {
                                        diesel::result::Error::DatabaseError(
                                            diesel::result::DatabaseErrorKind::UniqueViolation,
                                            _,
                                        ) => ExclusiveTxnError::DuplicateId(
                                            *write.entity.id().as_uuid(),
                                        ),
                                        other => ExclusiveTxnError::Diesel(other),
                                    })?;
                            }
                            Some(expected) => {
                                let changes = update_row(&write.entity);
                                let updated = diesel::update(
                                    competitors::table.filter(
                                        competitors::id.eq(write.entity.id.as_uuid()).and(
                                            competitors::revision.eq(revision_to_db(expected)),
                                        ),
                                    ),
                                )
                                .set(&changes)
                                .execute(conn)
                                .await?;
                                if updated == 0 {
                                    return Err(ExclusiveTxnError::StaleSet);
                                }
                            }
                        }
                    }

                    Ok(())
                }
                .scope_boxed()
            })
            .await;

        outcome.map_err(|err| match err {
            ExclusiveTxnError::Diesel(err) => map_diesel_error(err),
            ExclusiveTxnError::StaleSet => EntityRepositoryError::stale_set(owner_id.to_string()),
            ExclusiveTxnError::DuplicateId(id) => {
                EntityRepositoryError::duplicate_id(id.to_string())
            }
        })
    }

    async fn delete(
        &self,
        owner_id: &UserId,
        id: EntityId,
    ) -> Result<bool, EntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            competitors::table.filter(
                competitors::id
                    .eq(id.as_uuid())
                    .and(competitors::user_id.eq(owner_id.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn row_round_trips_into_the_domain_type() {
        let now = Utc::now();
        let row = CompetitorRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Rival Co".to_owned(),
            website: Some("https://rival.example".to_owned()),
            strengths: None,
            weaknesses: None,
            pricing_strategy: None,
            market_position: None,
            is_primary: false,
            revision: 2,
            created_at: now,
            updated_at: now,
        };

        let competitor = row_to_competitor(row);
        assert_eq!(competitor.revision, 2);
        assert!(!competitor.is_primary);

        let update = update_row(&competitor);
        assert_eq!(update.website, Some("https://rival.example"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(repo_err, EntityRepositoryError::Query { .. }));
    }
}
