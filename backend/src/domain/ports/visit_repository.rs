//! Write-side port for the visit ledger.
use std::collections::hash_map::Entry;

use async_trait::async_trait;

use crate::domain::NewVisit;

use super::define_port_error;
use super::fixture_ledger::FixtureLedger;

define_port_error! {
    /// Errors raised when recording a visit.
    pub enum VisitRepositoryError {
        /// The user already has a visit recorded for this park.
        DuplicateVisit => "visit already recorded for this park",
        /// The referenced park (or user) does not exist.
        UnknownPark => "park does not exist",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "visit repository connection failed: {message}",
        /// Insert failed for any other reason.
        Query { message: String } =>
            "visit repository query failed: {message}",
    }
}

/// Port for appending visits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Insert one visit dated by the store. Visits are never updated.
    async fn record_visit(&self, visit: &NewVisit) -> Result<(), VisitRepositoryError>;
}

/// Fixture implementation appending to a [`FixtureLedger`].
///
/// Enforces the same rules as the store: the park must exist and each user
/// may record a park once.
#[derive(Clone, Default)]
pub struct FixtureVisitRepository {
    ledger: FixtureLedger,
}

impl FixtureVisitRepository {
    /// Append visits to `ledger`.
    pub fn new(ledger: FixtureLedger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl VisitRepository for FixtureVisitRepository {
    async fn record_visit(&self, visit: &NewVisit) -> Result<(), VisitRepositoryError> {
        let park_id = visit.park_id.get();
        if !self.ledger.parks().iter().any(|park| park.id == park_id) {
            return Err(VisitRepositoryError::UnknownPark);
        }
        let today = self.ledger.today();
        let mut visits = self.ledger.visits();
        match visits.entry((visit.user_id.get(), park_id)) {
            Entry::Occupied(_) => Err(VisitRepositoryError::DuplicateVisit),
            Entry::Vacant(slot) => {
                slot.insert(today);
                Ok(())
            }
        }
    }
}
