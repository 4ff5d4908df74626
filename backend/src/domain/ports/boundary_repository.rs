//! Read-side port for the static map layers: regions and park polygons.
//!
//! Geometry processing (simplification, GeoJSON serialisation) happens in the
//! spatial store; adapters hand back ready-to-render feature collections with
//! a `name` property on every feature.

use async_trait::async_trait;
use geojson::FeatureCollection;

use super::define_port_error;

/// Simplification tolerance, in degrees, applied to region outlines.
pub const REGION_SIMPLIFY_TOLERANCE: f64 = 0.001;

/// Feature property carrying the display name of a region or park.
pub const NAME_PROPERTY: &str = "name";

define_port_error! {
    /// Errors raised when reading boundary layers.
    pub enum BoundaryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "boundary read connection failed: {message}",
        /// Query failed during execution or geometry decoding.
        Query { message: String } =>
            "boundary read query failed: {message}",
    }
}

/// Port for reading region and park boundary layers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoundaryRepository: Send + Sync {
    /// All regions, outlines simplified by [`REGION_SIMPLIFY_TOLERANCE`].
    async fn fetch_regions(&self) -> Result<FeatureCollection, BoundaryRepositoryError>;

    /// All park polygons, unsimplified. Unnamed parks are labelled `"Park"`.
    async fn fetch_parks(&self) -> Result<FeatureCollection, BoundaryRepositoryError>;
}

/// Build an empty feature collection.
pub fn empty_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    }
}

/// Fixture implementation returning empty layers.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBoundaryRepository;

#[async_trait]
impl BoundaryRepository for FixtureBoundaryRepository {
    async fn fetch_regions(&self) -> Result<FeatureCollection, BoundaryRepositoryError> {
        Ok(empty_collection())
    }

    async fn fetch_parks(&self) -> Result<FeatureCollection, BoundaryRepositoryError> {
        Ok(empty_collection())
    }
}
