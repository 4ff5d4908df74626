//! Shared error mapping and row helpers for the Diesel adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Store failure classes shared by every adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFailure {
    /// The connection dropped mid-call.
    Connection,
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation,
    /// Anything else.
    Query,
}

/// Classify a Diesel error and emit debug context.
///
/// Driver messages stay in the debug log; callers only see a short summary.
pub fn classify_diesel_error(
    error: &DieselError,
    operation: &'static str,
) -> (StoreFailure, &'static str) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        _ => debug!(%error, operation, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => (StoreFailure::Query, "record not found"),
        DieselError::QueryBuilderError(_) => (StoreFailure::Query, "database query error"),
        DieselError::DeserializationError(_) => (StoreFailure::Query, "row decoding error"),
        DieselError::DatabaseError(kind, _) => match kind {
            DatabaseErrorKind::ClosedConnection => {
                (StoreFailure::Connection, "database connection error")
            }
            DatabaseErrorKind::UniqueViolation => {
                (StoreFailure::UniqueViolation, "unique constraint violated")
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                (StoreFailure::ForeignKeyViolation, "foreign key constraint violated")
            }
            _ => (StoreFailure::Query, "database error"),
        },
        _ => (StoreFailure::Query, "database error"),
    }
}

/// Map a Diesel error for read adapters, which only distinguish connection
/// loss from everything else.
pub fn map_read_error<E, Q, C>(
    error: DieselError,
    operation: &'static str,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match classify_diesel_error(&error, operation) {
        (StoreFailure::Connection, message) => connection(message),
        (_, message) => query(message),
    }
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
