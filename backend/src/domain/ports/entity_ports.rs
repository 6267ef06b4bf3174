//! Driving ports for owner-scoped flagged entity use-cases.
//!
//! HTTP handlers depend on these traits rather than on the concrete
//! exclusive-flag service so they remain testable without storage.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{EntityId, Error, OwnedEntity, UserId};

/// Create-or-update request for an owner-scoped entity.
///
/// `target_id` absent means create; present means update that record. The
/// draft travels through unchanged — the domain imposes no invariants on
/// the free-form attributes.
#[derive(Debug, Clone)]
pub struct UpsertEntityRequest<E: OwnedEntity> {
    /// The caller, established by the inbound adapter.
    pub owner_id: UserId,
    /// Record to update, or `None` to create a new one.
    pub target_id: Option<EntityId>,
    /// Desired state of the exclusive primary flag.
    pub wants_primary: bool,
    /// Free-form attribute payload.
    pub draft: E::Draft,
}

/// Command port covering entity mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnedEntityCommand<E: OwnedEntity>: Send + Sync {
    /// Create or update an entity, enforcing the single-primary invariant.
    ///
    /// Returns the persisted record, echoing its identifier and final
    /// primary flag.
    async fn upsert(&self, request: UpsertEntityRequest<E>) -> Result<E, Error>;

    /// Delete an entity owned by the caller.
    ///
    /// Deleting the current primary leaves the owner with zero primaries;
    /// no replacement is elected.
    async fn delete(&self, owner_id: &UserId, id: EntityId) -> Result<(), Error>;
}

/// Query port covering entity reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnedEntityQuery<E: OwnedEntity>: Send + Sync {
    /// List every entity belonging to the caller.
    async fn list(&self, owner_id: &UserId) -> Result<Vec<E>, Error>;

    /// Fetch one entity owned by the caller.
    async fn get(&self, owner_id: &UserId, id: EntityId) -> Result<E, Error>;
}

/// Fixture command implementation that fabricates records without storage.
///
/// `upsert` returns a record built from the request as if it were freshly
/// created; `delete` always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOwnedEntityCommand;

#[async_trait]
impl<E: OwnedEntity> OwnedEntityCommand<E> for FixtureOwnedEntityCommand {
    async fn upsert(&self, request: UpsertEntityRequest<E>) -> Result<E, Error> {
        let UpsertEntityRequest {
            owner_id,
            target_id,
            wants_primary,
            draft,
        } = request;
        let id = target_id.unwrap_or_else(EntityId::random);
        Ok(E::create(id, owner_id, draft, wants_primary, Utc::now()))
    }

    async fn delete(&self, _owner_id: &UserId, _id: EntityId) -> Result<(), Error> {
        Ok(())
    }
}

/// Fixture query implementation exposing an empty collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOwnedEntityQuery;

#[async_trait]
impl<E: OwnedEntity> OwnedEntityQuery<E> for FixtureOwnedEntityQuery {
    async fn list(&self, _owner_id: &UserId) -> Result<Vec<E>, Error> {
        Ok(Vec::new())
    }

    async fn get(&self, _owner_id: &UserId, id: EntityId) -> Result<E, Error> {
        Err(Error::not_found(format!("{} {id} not found", E::KIND)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Company, CompanyDraft, ErrorCode};

    fn draft() -> CompanyDraft {
        CompanyDraft {
            name: "Acme".to_owned(),
            industry: None,
            description: None,
            products_services: None,
            value_proposition: None,
            target_market: None,
            website: None,
            company_size: None,
        }
    }

    #[tokio::test]
    async fn fixture_command_echoes_the_requested_flag() {
        let command = FixtureOwnedEntityCommand;
        let owner = UserId::random();

        let company: Company = command
            .upsert(UpsertEntityRequest {
                owner_id: owner.clone(),
                target_id: None,
                wants_primary: true,
                draft: draft(),
            })
            .await
            .expect("fixture upsert");

        assert_eq!(company.owner_id, owner);
        assert!(company.is_primary);
    }

    #[tokio::test]
    async fn fixture_query_reports_missing_records() {
        let query = FixtureOwnedEntityQuery;
        let owner = UserId::random();

        let listed: Vec<Company> = query.list(&owner).await.expect("fixture list");
        assert!(listed.is_empty());

        let error = OwnedEntityQuery::<Company>::get(&query, &owner, EntityId::random())
            .await
            .expect_err("fixture get");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
