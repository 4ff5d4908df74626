//! Read-side port for park status rows and aggregate visit statistics.

use async_trait::async_trait;

use crate::domain::{Centroid, ParkId, ParkStatus, ParkVisitInfo, ParkVisitStat, Role, UserId};

use super::define_port_error;
use super::fixture_ledger::{FixtureLedger, visit_count};

define_port_error! {
    /// Errors raised when reading park rows.
    pub enum ParkRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "park read connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "park read query failed: {message}",
    }
}

/// Port for reading parks together with their visit information.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParkRepository: Send + Sync {
    /// Every park with its centroid and role-dependent visit information.
    ///
    /// Admin rows carry [`crate::domain::ParkVisitInfo::Admin`] with the total
    /// number of visits across all users, in no particular order. User rows
    /// carry [`crate::domain::ParkVisitInfo::User`] with the date of
    /// `user_id`'s own visit, ordered by park name.
    async fn parks_for_user(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<Vec<ParkStatus>, ParkRepositoryError>;

    /// One row per park, zero-visit parks included, ordered by visit count
    /// descending and then by park name.
    async fn admin_stats(&self) -> Result<Vec<ParkVisitStat>, ParkRepositoryError>;
}

/// Fixture implementation serving the parks of a [`FixtureLedger`].
#[derive(Clone, Default)]
pub struct FixtureParkRepository {
    ledger: FixtureLedger,
}

impl FixtureParkRepository {
    /// Read parks and visits from `ledger`.
    pub fn new(ledger: FixtureLedger) -> Self {
        Self { ledger }
    }
}

fn invalid_fixture(err: impl std::fmt::Display) -> ParkRepositoryError {
    ParkRepositoryError::query(err.to_string())
}

#[async_trait]
impl ParkRepository for FixtureParkRepository {
    async fn parks_for_user(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<Vec<ParkStatus>, ParkRepositoryError> {
        let visits = self.ledger.visits();
        self.ledger
            .parks()
            .iter()
            .map(|park| -> Result<ParkStatus, ParkRepositoryError> {
                let visit = match role {
                    Role::Admin => ParkVisitInfo::Admin {
                        visit_count: visit_count(&visits, park.id),
                    },
                    Role::User => {
                        ParkVisitInfo::user(visits.get(&(user_id.get(), park.id)).copied())
                    }
                };
                Ok(ParkStatus {
                    id: ParkId::new(park.id).map_err(invalid_fixture)?,
                    name: park.name.to_owned(),
                    centroid: Centroid::new(park.lat, park.lon).map_err(invalid_fixture)?,
                    visit,
                })
            })
            .collect()
    }

    async fn admin_stats(&self) -> Result<Vec<ParkVisitStat>, ParkRepositoryError> {
        let visits = self.ledger.visits();
        let mut stats: Vec<ParkVisitStat> = self
            .ledger
            .parks()
            .iter()
            .map(|park| ParkVisitStat {
                park_name: park.name.to_owned(),
                visit_count: visit_count(&visits, park.id),
            })
            .collect();
        stats.sort_by(|a, b| {
            b.visit_count
                .cmp(&a.visit_count)
                .then_with(|| a.park_name.cmp(&b.park_name))
        });
        Ok(stats)
    }
}
