//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod boundary_repository;
mod fixture_ledger;
mod login_service;
mod park_map_query;
mod park_repository;
mod user_credentials_repository;
mod visit_command;
mod visit_repository;

#[cfg(test)]
pub use boundary_repository::MockBoundaryRepository;
pub use boundary_repository::{
    BoundaryRepository, BoundaryRepositoryError, FixtureBoundaryRepository, NAME_PROPERTY,
    REGION_SIMPLIFY_TOLERANCE, empty_collection,
};
pub use fixture_ledger::FixtureLedger;
pub use login_service::{FixtureLoginService, LoginService};
pub use park_map_query::ParkMapQuery;
#[cfg(test)]
pub use park_repository::MockParkRepository;
pub use park_repository::{FixtureParkRepository, ParkRepository, ParkRepositoryError};
#[cfg(test)]
pub use user_credentials_repository::MockUserCredentialsRepository;
pub use user_credentials_repository::{
    FixtureUserCredentialsRepository, UserCredentialsRepository, UserCredentialsRepositoryError,
};
pub use visit_command::{VisitCommand, VisitSubmission};
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
pub use visit_repository::{FixtureVisitRepository, VisitRepository, VisitRepositoryError};
