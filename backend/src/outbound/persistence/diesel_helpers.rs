//! Shared Diesel error mapping and batch-verification helpers for the
//! persistence adapters.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::domain::EntityId;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_pool_error_with<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Captures the repeated mapping used by repositories where `NotFound` and
/// query-builder failures should map to query errors. The raw database
/// message is logged, never surfaced.
pub(crate) fn map_diesel_error_with<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Cast a domain revision (u32) to its database representation (i32).
#[expect(
    clippy::cast_possible_wrap,
    reason = "revision values are always small positive integers"
)]
pub(crate) fn revision_to_db(revision: u32) -> i32 {
    revision as i32
}

/// Cast a database revision (i32) back to the domain representation (u32).
#[expect(
    clippy::cast_sign_loss,
    reason = "revision is always non-negative in the database"
)]
pub(crate) fn revision_from_db(revision: i32) -> u32 {
    revision as u32
}

/// Compare a service read-set snapshot against the locked owner rows.
///
/// Set membership and revisions must both match exactly: a bumped revision,
/// a vanished row, or a phantom insert each invalidates the batch.
pub(crate) fn read_set_matches(read_set: &[(EntityId, u32)], current: &[(Uuid, i32)]) -> bool {
    if read_set.len() != current.len() {
        return false;
    }
    let current_map: HashMap<Uuid, i32> = current.iter().copied().collect();
    read_set.iter().all(|(id, revision)| {
        current_map.get(id.as_uuid()) == Some(&revision_to_db(*revision))
    })
}
