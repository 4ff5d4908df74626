//! PostgreSQL-backed visit ledger.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::NewVisit;
use crate::domain::ports::{VisitRepository, VisitRepositoryError};

use super::diesel_helpers::{StoreFailure, classify_diesel_error, map_pool_error_message};
use super::models::NewVisitRow;
use super::pool::{DbPool, PoolError};
use super::schema::visits;

/// Diesel-backed implementation of [`VisitRepository`].
#[derive(Clone)]
pub struct DieselVisitRepository {
    pool: DbPool,
}

impl DieselVisitRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VisitRepositoryError {
    VisitRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> VisitRepositoryError {
    match classify_diesel_error(&error, "visit insert") {
        (StoreFailure::UniqueViolation, _) => VisitRepositoryError::duplicate_visit(),
        (StoreFailure::ForeignKeyViolation, _) => VisitRepositoryError::unknown_park(),
        (StoreFailure::Connection, message) => VisitRepositoryError::connection(message),
        (StoreFailure::Query, message) => VisitRepositoryError::query(message),
    }
}

#[async_trait]
impl VisitRepository for DieselVisitRepository {
    async fn record_visit(&self, visit: &NewVisit) -> Result<(), VisitRepositoryError> {
        let row = NewVisitRow {
            user_id: visit.user_id.get(),
            park_id: visit.park_id.get(),
            rating: i16::from(visit.rating.get()),
            note: visit.note.as_ref(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(visits::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("constraint".to_string()))
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_visit() {
        let err = map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation));
        assert_eq!(err, VisitRepositoryError::DuplicateVisit);
        assert_eq!(err.to_string(), "visit already recorded for this park");
    }

    #[rstest]
    fn foreign_key_violation_maps_to_unknown_park() {
        let err = map_diesel_error(database_error(DatabaseErrorKind::ForeignKeyViolation));
        assert_eq!(err, VisitRepositoryError::UnknownPark);
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::CheckViolation))]
    #[case(DieselError::NotFound)]
    fn other_failures_stay_generic(#[case] error: DieselError) {
        assert!(matches!(
            map_diesel_error(error),
            VisitRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let err = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection));
        assert!(matches!(err, VisitRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(err.to_string().contains("connection refused"));
    }
}
