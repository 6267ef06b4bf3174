//! Exclusive primary-flag enforcement for owner-scoped entity collections.
//!
//! [`ExclusiveFlagService`] implements the driving ports for companies and
//! competitors and owns the one real invariant in this system: for a fixed
//! owner, at most one entity in the collection carries the primary flag at
//! any point observable between transactions.
//!
//! Every mutation is a read-modify-write over the owner's whole collection.
//! The service snapshots the set it read, plans the rows that must change,
//! and hands both to the repository as one atomic batch. The repository
//! serialises batches per owner and rejects any batch whose snapshot no
//! longer matches storage, which the service surfaces as a conflict for the
//! caller to retry. Promotion never assumes the set was well-formed: it
//! demotes every other flagged row it can see, not just the first.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    EntityRepository, EntityRepositoryError, ExclusiveBatch, OwnedEntityCommand, OwnedEntityQuery,
    UpsertEntityRequest, VersionedWrite,
};
use crate::domain::{EntityId, Error, OwnedEntity, UserId};

/// Domain service enforcing the single-primary-per-owner invariant.
///
/// Generic over the entity kind so companies and competitors share one
/// implementation; instantiated once per collection with its repository.
#[derive(Clone)]
pub struct ExclusiveFlagService<E, R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R> ExclusiveFlagService<E, R> {
    /// Create a new service with the given repository and clock.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            _entity: PhantomData,
        }
    }
}

impl<E, R> ExclusiveFlagService<E, R>
where
    E: OwnedEntity,
    R: EntityRepository<E>,
{
    fn map_repository_error(error: EntityRepositoryError) -> Error {
        match error {
            EntityRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("entity store unavailable: {message}"))
            }
            EntityRepositoryError::Query { message } => {
                Error::internal(format!("entity store error: {message}"))
            }
            EntityRepositoryError::StaleSet { .. } => {
                Error::conflict("the collection changed concurrently; retry with fresh data")
                    .with_details(json!({ "code": "stale_set" }))
            }
            EntityRepositoryError::DuplicateId { id } => {
                Error::conflict(format!("{} {id} was created concurrently", E::KIND))
                    .with_details(json!({ "code": "duplicate_id" }))
            }
        }
    }

    fn ownership_error(id: EntityId) -> Error {
        Error::forbidden(format!(
            "{} {id} does not belong to the requesting user",
            E::KIND
        ))
    }

    fn missing_error(id: EntityId) -> Error {
        Error::not_found(format!("{} {id} not found", E::KIND))
    }

    /// Distinguish a foreign record from an absent one for error reporting.
    async fn missing_target_error(&self, id: EntityId) -> Error {
        match self.repo.find(id).await {
            Ok(Some(_)) => Self::ownership_error(id),
            Ok(None) => Self::missing_error(id),
            Err(err) => Self::map_repository_error(err),
        }
    }

    /// Fetch a record and enforce that the caller owns it.
    async fn load_owned(&self, owner_id: &UserId, id: EntityId) -> Result<E, Error> {
        let existing = self
            .repo
            .find(id)
            .await
            .map_err(Self::map_repository_error)?;
        let Some(entity) = existing else {
            return Err(Self::missing_error(id));
        };
        if entity.owner_id() != owner_id {
            return Err(Self::ownership_error(id));
        }
        Ok(entity)
    }
}

#[async_trait]
impl<E, R> OwnedEntityCommand<E> for ExclusiveFlagService<E, R>
where
    E: OwnedEntity,
    R: EntityRepository<E>,
{
    async fn upsert(&self, request: UpsertEntityRequest<E>) -> Result<E, Error> {
        let UpsertEntityRequest {
            owner_id,
            target_id,
            wants_primary,
            draft,
        } = request;
        let now = self.clock.utc();

        let set = self
            .repo
            .list_for_owner(&owner_id)
            .await
            .map_err(Self::map_repository_error)?;
        let read_set: Vec<(EntityId, u32)> =
            set.iter().map(|entity| (entity.id(), entity.revision())).collect();

        let (target, expected_revision) = match target_id {
            Some(id) => {
                let Some(existing) = set.iter().find(|entity| entity.id() == id) else {
                    return Err(self.missing_target_error(id).await);
                };
                let prior = existing.revision();
                let mut updated = existing.clone();
                updated.apply_draft(draft, wants_primary, now);
                (updated, Some(prior))
            }
            None => (
                E::create(EntityId::random(), owner_id.clone(), draft, wants_primary, now),
                None,
            ),
        };

        let mut writes = Vec::new();
        if wants_primary {
            // Demote every other flagged row, however many there are. The set
            // may already violate the invariant; promotion repairs it.
            for other in set
                .iter()
                .filter(|entity| entity.id() != target.id() && entity.is_primary())
            {
                let prior = other.revision();
                let mut cleared = other.clone();
                cleared.clear_primary(now);
                writes.push(VersionedWrite {
                    entity: cleared,
                    expected_revision: Some(prior),
                });
            }
        }
        writes.push(VersionedWrite {
            entity: target.clone(),
            expected_revision,
        });

        self.repo
            .apply(&owner_id, ExclusiveBatch { writes, read_set })
            .await
            .map_err(Self::map_repository_error)?;

        Ok(target)
    }

    async fn delete(&self, owner_id: &UserId, id: EntityId) -> Result<(), Error> {
        let _ = self.load_owned(owner_id, id).await?;

        let removed = self
            .repo
            .delete(owner_id, id)
            .await
            .map_err(Self::map_repository_error)?;
        if !removed {
            // Lost a race with another deletion of the same row.
            return Err(Self::missing_error(id));
        }
        Ok(())
    }
}

#[async_trait]
impl<E, R> OwnedEntityQuery<E> for ExclusiveFlagService<E, R>
where
    E: OwnedEntity,
    R: EntityRepository<E>,
{
    async fn list(&self, owner_id: &UserId) -> Result<Vec<E>, Error> {
        self.repo
            .list_for_owner(owner_id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get(&self, owner_id: &UserId, id: EntityId) -> Result<E, Error> {
        self.load_owned(owner_id, id).await
    }
}
