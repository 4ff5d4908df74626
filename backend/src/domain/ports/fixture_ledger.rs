//! Shared in-memory state behind the fixture park and visit repositories.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use mockable::{Clock, DefaultClock};

/// Park served when no database is configured.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixturePark {
    pub id: i32,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// Ordered by name, the same order user rows are returned in.
const FIXTURE_PARKS: [FixturePark; 3] = [
    FixturePark {
        id: 3,
        name: "Bundek",
        lat: 45.787,
        lon: 15.993,
    },
    FixturePark {
        id: 7,
        name: "Maksimir",
        lat: 45.829,
        lon: 16.018,
    },
    FixturePark {
        id: 9,
        name: "Zrinjevac",
        lat: 45.810,
        lon: 15.978,
    },
];

/// Visit dates keyed by `(user id, park id)`.
pub(super) type Visits = HashMap<(i32, i32), NaiveDate>;

/// Park list and visit ledger shared between
/// [`super::FixtureParkRepository`] and [`super::FixtureVisitRepository`].
///
/// Clones share one ledger, so a visit recorded through one repository is
/// visible to reads through the other.
#[derive(Clone)]
pub struct FixtureLedger {
    clock: Arc<dyn Clock>,
    visits: Arc<Mutex<Visits>>,
}

impl Default for FixtureLedger {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl FixtureLedger {
    /// Empty ledger stamping visits with the clock's UTC date.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            visits: Arc::default(),
        }
    }

    pub(super) fn parks(&self) -> &'static [FixturePark] {
        &FIXTURE_PARKS
    }

    pub(super) fn visits(&self) -> MutexGuard<'_, Visits> {
        self.visits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

/// Number of recorded visits for `park_id`.
pub(super) fn visit_count(visits: &Visits, park_id: i32) -> u64 {
    visits.keys().filter(|(_, park)| *park == park_id).map(|_| 1).sum()
}
