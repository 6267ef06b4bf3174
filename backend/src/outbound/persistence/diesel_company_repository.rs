//! PostgreSQL-backed `EntityRepository<Company>` implementation using Diesel.
//!
//! The exclusive write path runs inside one transaction: the owner's rows
//! are locked with `FOR UPDATE` so concurrent batches for the same owner
//! queue behind each other, then the service's read-set snapshot is checked
//! against the locked rows before any write lands. A failed check rolls the
//! whole batch back and surfaces as a stale-set error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{EntityRepository, EntityRepositoryError, ExclusiveBatch};
use crate::domain::{Company, EntityId, OwnedEntity, UserId};

use super::diesel_helpers::{
    map_diesel_error_with, map_pool_error_with, read_set_matches, revision_from_db, revision_to_db,
};
use super::models::{CompanyRow, CompanyUpdate, NewCompanyRow};
use super::pool::{DbPool, PoolError};
use super::schema::companies;

/// Diesel-backed implementation of the company repository port.
#[derive(Clone)]
pub struct DieselCompanyRepository {
    pool: DbPool,
}

impl DieselCompanyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Internal error carried through the exclusive-write transaction.
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

fn row_to_company(row: CompanyRow) -> Company {
    Company {
        id: EntityId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.user_id),
        name: row.name,
        industry: row.industry,
        description: row.description,
        products_services: row.products_services,
        value_proposition: row.value_proposition,
        target_market: row.target_market,
        website: row.website,
        company_size: row.company_size,
        is_primary: row.is_primary,
        revision: revision_from_db(row.revision),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn insert_row(company: &Company) -> NewCompanyRow<'_> {
    NewCompanyRow {
        id: *company.id.as_uuid(),
        user_id: *company.owner_id.as_uuid(),
        name: company.name.as_str(),
        industry: company.industry.as_deref(),
        description: company.description.as_deref(),
        products_services: company.products_services.as_deref(),
        value_proposition: company.value_proposition.as_deref(),
        target_market: company.target_market.as_deref(),
        website: company.website.as_deref(),
        company_size: company.company_size.as_deref(),
        is_primary: company.is_primary,
        revision: revision_to_db(company.revision),
        created_at: company.created_at,
        updated_at: company.updated_at,
    }
}

fn update_row(company: &Company) -> CompanyUpdate<'_> {
    CompanyUpdate {
        name: company.name.as_str(),
        industry: company.industry.as_deref(),
        description: company.description.as_deref(),
        products_services: company.products_services.as_deref(),
        value_proposition: company.value_proposition.as_deref(),
        target_market: company.target_market.as_deref(),
        website: company.website.as_deref(),
        company_size: company.company_size.as_deref(),
        is_primary: company.is_primary,
        revision: revision_to_db(company.revision),
        updated_at: company.updated_at,
    }
}

#[async_trait]
impl EntityRepository<Company> for DieselCompanyRepository {
    async fn list_for_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Company>, EntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CompanyRow> = companies::table
            .filter(companies::user_id.eq(owner_id.as_uuid()))
            .select(CompanyRow::as_select())
            .order_by((companies::created_at, companies::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_company).collect())
    }

    async fn find(&self, id: EntityId) -> Result<Option<Company>, EntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CompanyRow> = companies::table
            .filter(companies::id.eq(id.as_uuid()))
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_company))
    }

    async fn apply(
        &self,
        owner_id: &UserId,
        batch: ExclusiveBatch<Company>,
    ) -> Result<(), EntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_uuid = *owner_id.as_uuid();
        let batch_ref = &batch;

        let outcome = conn
            .transaction::<_, ExclusiveTxnError, _>(|conn| {
                async move {
                    // Lock the owner's rows; a concurrent promoter for the
                    // same owner queues here until this batch commits.
                    let current: Vec<(Uuid, i32)> = companies::table
                        .filter(companies::user_id.eq(owner_uuid))
                        .select((companies::id, companies::revision))
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
                                diesel::insert_into(companies::table)
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
                                    companies::table.filter(
                                        companies::id.eq(write.entity.id.as_uuid()).and(
                                            companies::revision.eq(revision_to_db(expected)),
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
            companies::table.filter(
                companies::id
                    .eq(id.as_uuid())
                    .and(companies::user_id.eq(owner_id.as_uuid())),
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
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, EntityRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, EntityRepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn row_round_trips_into_the_domain_type() {
        let now = Utc::now();
        let row = CompanyRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Acme".to_owned(),
            industry: Some("Tooling".to_owned()),
            description: None,
            products_services: None,
            value_proposition: None,
            target_market: None,
            website: None,
            company_size: None,
            is_primary: true,
            revision: 4,
            created_at: now,
            updated_at: now,
        };
        let id = row.id;

        let company = row_to_company(row);
        assert_eq!(company.id.as_uuid(), &id);
        assert!(company.is_primary);
        assert_eq!(company.revision, 4);

        let back = insert_row(&company);
        assert_eq!(back.revision, 4);
        assert_eq!(back.name, "Acme");
    }
}
