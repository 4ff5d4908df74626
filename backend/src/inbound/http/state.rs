//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever see driving ports,
//! so tests can swap any of them for an in-memory double.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureBoundaryRepository, FixtureLedger, FixtureLoginService, FixtureParkRepository,
    FixtureVisitRepository, LoginService, ParkMapQuery, VisitCommand,
};
use crate::domain::{ParkMapService, VisitService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub parks: Arc<dyn ParkMapQuery>,
    pub visits: Arc<dyn VisitCommand>,
}

impl HttpState {
    pub fn new(
        login: Arc<dyn LoginService>,
        parks: Arc<dyn ParkMapQuery>,
        visits: Arc<dyn VisitCommand>,
    ) -> Self {
        Self {
            login,
            parks,
            visits,
        }
    }

    /// State backed entirely by in-memory fixtures.
    ///
    /// Two known accounts, three parks without outlines, and one visit ledger
    /// shared by the park reads and the visit writes.
    pub fn fixtures() -> Self {
        let ledger = FixtureLedger::default();
        Self::new(
            Arc::new(FixtureLoginService),
            Arc::new(ParkMapService::new(
                Arc::new(FixtureBoundaryRepository),
                Arc::new(FixtureParkRepository::new(ledger.clone())),
            )),
            Arc::new(VisitService::new(Arc::new(FixtureVisitRepository::new(
                ledger,
            )))),
        )
    }
}
