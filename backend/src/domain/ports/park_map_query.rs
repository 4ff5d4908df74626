//! Driving port for everything the map page reads.

use async_trait::async_trait;
use geojson::FeatureCollection;

use crate::domain::{AuthenticatedUser, ComposedMap, Error, ParkStatus, ParkVisitStat, ViewState};

/// Domain use-case port for map, park and view reads.
#[async_trait]
pub trait ParkMapQuery: Send + Sync {
    /// Simplified region outlines.
    async fn regions(&self) -> Result<FeatureCollection, Error>;

    /// Park polygons.
    async fn park_boundaries(&self) -> Result<FeatureCollection, Error>;

    /// Park rows for the user's role.
    async fn parks(&self, user: &AuthenticatedUser) -> Result<Vec<ParkStatus>, Error>;

    /// Visit counts per park. Administrators only.
    async fn stats(&self, user: &AuthenticatedUser) -> Result<Vec<ParkVisitStat>, Error>;

    /// Fully composed map for the user.
    async fn map(&self, user: &AuthenticatedUser) -> Result<ComposedMap, Error>;

    /// Page state for an optional session owner.
    async fn view(&self, user: Option<&AuthenticatedUser>) -> Result<ViewState, Error>;
}
