//! In-process memoisation of the static boundary layers.
//!
//! Region and park polygons change only when the reference data is reloaded,
//! yet every map render reads both. [`CachedBoundaryRepository`] wraps any
//! [`BoundaryRepository`] and serves each layer from memory until its TTL
//! elapses. Failures are never cached.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use geojson::FeatureCollection;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{BoundaryRepository, BoundaryRepositoryError};

#[derive(Clone)]
struct CachedLayer {
    fetched_at: DateTime<Utc>,
    collection: FeatureCollection,
}

#[derive(Default)]
struct LayerSlot(RwLock<Option<CachedLayer>>);

impl LayerSlot {
    fn fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> Option<FeatureCollection> {
        let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|layer| now.signed_duration_since(layer.fetched_at) < ttl)
            .map(|layer| layer.collection.clone())
    }

    fn store(&self, fetched_at: DateTime<Utc>, collection: FeatureCollection) {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CachedLayer {
            fetched_at,
            collection,
        });
    }
}

/// TTL cache decorator for a [`BoundaryRepository`].
pub struct CachedBoundaryRepository<B> {
    inner: Arc<B>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    regions: LayerSlot,
    parks: LayerSlot,
}

impl<B> CachedBoundaryRepository<B> {
    /// Wrap `inner`, keeping each layer for `ttl`.
    ///
    /// TTLs beyond chrono's range are clamped to the maximum delta.
    pub fn new(inner: Arc<B>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            inner,
            clock,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            regions: LayerSlot::default(),
            parks: LayerSlot::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Layer {
    Regions,
    Parks,
}

impl Layer {
    fn name(self) -> &'static str {
        match self {
            Self::Regions => "regions",
            Self::Parks => "parks",
        }
    }
}

impl<B> CachedBoundaryRepository<B>
where
    B: BoundaryRepository,
{
    async fn cached(&self, layer: Layer) -> Result<FeatureCollection, BoundaryRepositoryError> {
        let slot = match layer {
            Layer::Regions => &self.regions,
            Layer::Parks => &self.parks,
        };
        let now = self.clock.utc();
        if let Some(collection) = slot.fresh(now, self.ttl) {
            debug!(layer = layer.name(), "boundary cache hit");
            return Ok(collection);
        }
        debug!(layer = layer.name(), "boundary cache miss");
        let collection = match layer {
            Layer::Regions => self.inner.fetch_regions().await?,
            Layer::Parks => self.inner.fetch_parks().await?,
        };
        slot.store(now, collection.clone());
        Ok(collection)
    }
}

#[async_trait]
impl<B> BoundaryRepository for CachedBoundaryRepository<B>
where
    B: BoundaryRepository,
{
    async fn fetch_regions(&self) -> Result<FeatureCollection, BoundaryRepositoryError> {
        self.cached(Layer::Regions).await
    }

    async fn fetch_parks(&self) -> Result<FeatureCollection, BoundaryRepositoryError> {
        self.cached(Layer::Parks).await
    }
}
