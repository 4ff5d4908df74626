//! Park map domain services.
//!
//! These services implement the map-page driving ports on top of the
//! boundary, park and visit repositories.

use std::sync::Arc;

use async_trait::async_trait;
use geojson::FeatureCollection;
use tracing::{info, warn};

use crate::domain::ports::{
    BoundaryRepository, BoundaryRepositoryError, ParkMapQuery, ParkRepository,
    ParkRepositoryError, VisitCommand, VisitRepository, VisitRepositoryError, VisitSubmission,
};
use crate::domain::{
    AuthenticatedUser, ComposedMap, Error, NewVisit, ParkStatus, ParkVisitStat, ViewState,
    compose_map,
};

/// Client-facing message for every store outage; the cause is only logged.
pub(crate) const STORE_UNAVAILABLE: &str = "park store unavailable";

fn map_boundary_error(error: BoundaryRepositoryError) -> Error {
    match error {
        BoundaryRepositoryError::Connection { message } => {
            warn!(error = %message, "boundary repository unavailable");
            Error::service_unavailable(STORE_UNAVAILABLE)
        }
        BoundaryRepositoryError::Query { message } => {
            Error::internal(format!("boundary repository error: {message}"))
        }
    }
}

fn map_park_error(error: ParkRepositoryError) -> Error {
    match error {
        ParkRepositoryError::Connection { message } => {
            warn!(error = %message, "park repository unavailable");
            Error::service_unavailable(STORE_UNAVAILABLE)
        }
        ParkRepositoryError::Query { message } => {
            Error::internal(format!("park repository error: {message}"))
        }
    }
}

fn map_visit_error(error: VisitRepositoryError, submission: &VisitSubmission) -> Error {
    match error {
        VisitRepositoryError::DuplicateVisit => {
            Error::conflict("visit already recorded for this park")
        }
        VisitRepositoryError::UnknownPark => {
            Error::not_found(format!("park {} not found", submission.park_id))
        }
        VisitRepositoryError::Connection { message } => {
            warn!(error = %message, "visit repository unavailable");
            Error::service_unavailable(STORE_UNAVAILABLE)
        }
        VisitRepositoryError::Query { message } => {
            Error::internal(format!("visit repository error: {message}"))
        }
    }
}

/// Read-side service implementing [`ParkMapQuery`].
#[derive(Clone)]
pub struct ParkMapService<B, P> {
    boundary_repo: Arc<B>,
    park_repo: Arc<P>,
}

impl<B, P> ParkMapService<B, P> {
    /// Create a new query service with the boundary and park repositories.
    pub fn new(boundary_repo: Arc<B>, park_repo: Arc<P>) -> Self {
        Self {
            boundary_repo,
            park_repo,
        }
    }
}

impl<B, P> ParkMapService<B, P>
where
    B: BoundaryRepository,
    P: ParkRepository,
{
    async fn admin_stats(&self) -> Result<Vec<ParkVisitStat>, Error> {
        self.park_repo.admin_stats().await.map_err(map_park_error)
    }
}

#[async_trait]
impl<B, P> ParkMapQuery for ParkMapService<B, P>
where
    B: BoundaryRepository,
    P: ParkRepository,
{
    async fn regions(&self) -> Result<FeatureCollection, Error> {
        self.boundary_repo
            .fetch_regions()
            .await
            .map_err(map_boundary_error)
    }

    async fn park_boundaries(&self) -> Result<FeatureCollection, Error> {
        self.boundary_repo
            .fetch_parks()
            .await
            .map_err(map_boundary_error)
    }

    async fn parks(&self, user: &AuthenticatedUser) -> Result<Vec<ParkStatus>, Error> {
        self.park_repo
            .parks_for_user(user.id(), user.role())
            .await
            .map_err(map_park_error)
    }

    async fn stats(&self, user: &AuthenticatedUser) -> Result<Vec<ParkVisitStat>, Error> {
        if !user.role().is_admin() {
            return Err(Error::forbidden("visit statistics are restricted to administrators"));
        }
        self.admin_stats().await
    }

    async fn map(&self, user: &AuthenticatedUser) -> Result<ComposedMap, Error> {
        let (regions, parks, statuses) = futures_util::try_join!(
            self.regions(),
            self.park_boundaries(),
            self.parks(user),
        )?;
        compose_map(regions, parks, &statuses, user.role())
            .map_err(|err| Error::internal(format!("map composition failed: {err}")))
    }

    async fn view(&self, user: Option<&AuthenticatedUser>) -> Result<ViewState, Error> {
        let Some(user) = user else {
            return Ok(ViewState::unauthenticated());
        };
        let map = self.map(user).await?;
        let stats = if user.role().is_admin() {
            self.admin_stats().await?
        } else {
            Vec::new()
        };
        Ok(ViewState::authenticated(user, map, stats))
    }
}

/// Write-side service implementing [`VisitCommand`].
#[derive(Clone)]
pub struct VisitService<V> {
    visit_repo: Arc<V>,
}

impl<V> VisitService<V> {
    /// Create a new command service with the visit repository.
    pub fn new(visit_repo: Arc<V>) -> Self {
        Self { visit_repo }
    }
}

#[async_trait]
impl<V> VisitCommand for VisitService<V>
where
    V: VisitRepository,
{
    async fn record_visit(
        &self,
        user: &AuthenticatedUser,
        submission: VisitSubmission,
    ) -> Result<(), Error> {
        if user.role().is_admin() {
            return Err(Error::forbidden("administrators cannot record visits"));
        }
        let visit = NewVisit {
            user_id: user.id(),
            park_id: submission.park_id,
            rating: submission.rating,
            note: submission.note.clone(),
        };
        self.visit_repo
            .record_visit(&visit)
            .await
            .map_err(|err| map_visit_error(err, &submission))?;
        info!(
            user_id = %visit.user_id,
            park_id = %visit.park_id,
            rating = visit.rating.get(),
            "visit recorded"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "park_map_service_tests.rs"]
mod tests;
