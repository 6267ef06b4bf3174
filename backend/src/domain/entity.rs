//! Abstract shape shared by owner-scoped flagged records.
//!
//! Companies and competitors are both partitioned by owning user and carry a
//! single boolean "primary" marker governed by the exclusivity invariant in
//! [`crate::domain::ExclusiveFlagService`]. The trait below captures exactly
//! the surface that service needs; the free-form attributes stay on the
//! concrete types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Store-assigned identifier for an owner-scoped record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Wrap an already-parsed UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier for a new record.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner-scoped record carrying the exclusive primary flag.
///
/// # Contract
///
/// - `id` and `owner_id` are immutable after creation.
/// - [`OwnedEntity::apply_draft`] and [`OwnedEntity::clear_primary`] must
///   bump `revision` by one and refresh `updated_at`; they are the only
///   mutation paths.
/// - `revision` starts at 1 for freshly created records.
pub trait OwnedEntity: Clone + fmt::Debug + Send + Sync + 'static {
    /// Free-form attribute payload carried by create and update requests.
    type Draft: Clone + fmt::Debug + Send + Sync + 'static;

    /// Short lower-case noun used in error messages and log fields.
    const KIND: &'static str;

    /// Store-assigned identifier.
    fn id(&self) -> EntityId;

    /// Owning user; partitions the collection and controls access.
    fn owner_id(&self) -> &UserId;

    /// Whether this record is the owner's preferred one.
    fn is_primary(&self) -> bool;

    /// Optimistic-concurrency counter, bumped on every mutation.
    fn revision(&self) -> u32;

    /// Timestamp of the last mutation.
    fn updated_at(&self) -> DateTime<Utc>;

    /// Construct a brand-new record from a draft at revision 1.
    fn create(
        id: EntityId,
        owner_id: UserId,
        draft: Self::Draft,
        is_primary: bool,
        at: DateTime<Utc>,
    ) -> Self;

    /// Overwrite the free-form attributes and the primary flag.
    fn apply_draft(&mut self, draft: Self::Draft, is_primary: bool, at: DateTime<Utc>);

    /// Demote the record, clearing its primary flag.
    fn clear_primary(&mut self, at: DateTime<Utc>);
}
