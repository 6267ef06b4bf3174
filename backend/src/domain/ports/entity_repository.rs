//! Driven port for owner-scoped flagged entity persistence.
//!
//! The [`EntityRepository`] trait is the transactional boundary the
//! exclusive-flag service controls: reads return plain snapshots, and all
//! writes travel through [`EntityRepository::apply`] as one atomic batch
//! accompanied by the read-set the service based its decision on. Adapters
//! must serialise concurrent batches for the same owner (row locks or an
//! equivalent) and reject any batch whose read-set no longer matches the
//! stored state.

use async_trait::async_trait;

use crate::domain::{EntityId, OwnedEntity, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by entity repository adapters.
    pub enum EntityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "entity store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "entity store query failed: {message}",
        /// The owner's entity set changed between read and write.
        StaleSet { owner_id: String } =>
            "entity set for owner {owner_id} changed since it was read",
        /// An insert collided with an existing identifier.
        DuplicateId { id: String } =>
            "entity {id} already exists",
    }
}

/// A single row in an atomic exclusive write.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedWrite<E> {
    /// The row as it must be stored, revision already bumped.
    pub entity: E,
    /// The revision the row held when it was read; `None` marks an insert.
    pub expected_revision: Option<u32>,
}

/// Atomic write batch covering every row the service decided to change.
///
/// `read_set` snapshots the owner's *entire* collection as `(id, revision)`
/// pairs at read time. Adapters compare it against current storage inside
/// the same transaction that applies the writes; any divergence — bumped
/// revisions, vanished rows, or phantom inserts — fails the whole batch
/// with [`EntityRepositoryError::StaleSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusiveBatch<E> {
    /// Rows to insert or update, all-or-nothing.
    pub writes: Vec<VersionedWrite<E>>,
    /// `(id, revision)` snapshot of the owner's full set at read time.
    pub read_set: Vec<(EntityId, u32)>,
}

/// Port for owner-scoped flagged entity storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityRepository<E: OwnedEntity>: Send + Sync {
    /// Fetch every entity belonging to `owner_id`.
    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<E>, EntityRepositoryError>;

    /// Fetch a single entity regardless of owner.
    ///
    /// Used to distinguish "does not exist" from "belongs to someone else";
    /// callers must perform the ownership check on the result.
    async fn find(&self, id: EntityId) -> Result<Option<E>, EntityRepositoryError>;

    /// Atomically persist a batch for one owner.
    ///
    /// Either every row in the batch lands or none do. Serialises against
    /// concurrent batches for the same owner.
    async fn apply(
        &self,
        owner_id: &UserId,
        batch: ExclusiveBatch<E>,
    ) -> Result<(), EntityRepositoryError>;

    /// Delete a row scoped to its owner; returns whether a row was removed.
    async fn delete(&self, owner_id: &UserId, id: EntityId)
    -> Result<bool, EntityRepositoryError>;
}

/// Fixture implementation backed by no storage at all.
///
/// Lookups return empty results and writes are discarded. Use it in tests
/// where entity persistence is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEntityRepository;

#[async_trait]
impl<E: OwnedEntity> EntityRepository<E> for FixtureEntityRepository {
    async fn list_for_owner(&self, _owner_id: &UserId) -> Result<Vec<E>, EntityRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(&self, _id: EntityId) -> Result<Option<E>, EntityRepositoryError> {
        Ok(None)
    }

    async fn apply(
        &self,
        _owner_id: &UserId,
        _batch: ExclusiveBatch<E>,
    ) -> Result<(), EntityRepositoryError> {
        Ok(())
    }

    async fn delete(
        &self,
        _owner_id: &UserId,
        _id: EntityId,
    ) -> Result<bool, EntityRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Company;

    #[tokio::test]
    async fn fixture_repository_reads_come_back_empty() {
        let repo = FixtureEntityRepository;
        let owner = UserId::random();

        let companies: Vec<Company> = repo.list_for_owner(&owner).await.expect("fixture list");
        assert!(companies.is_empty());

        let found: Option<Company> = repo.find(EntityId::random()).await.expect("fixture find");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn fixture_repository_accepts_writes() {
        let repo = FixtureEntityRepository;
        let owner = UserId::random();
        let batch: ExclusiveBatch<Company> = ExclusiveBatch {
            writes: Vec::new(),
            read_set: Vec::new(),
        };

        repo.apply(&owner, batch).await.expect("fixture apply");
        let removed = EntityRepository::<Company>::delete(&repo, &owner, EntityId::random())
            .await
            .expect("fixture delete");
        assert!(!removed);
    }

    #[test]
    fn stale_set_error_names_the_owner() {
        let owner = UserId::random();
        let error = EntityRepositoryError::stale_set(owner.to_string());
        assert!(error.to_string().contains(owner.as_ref()));
    }
}
