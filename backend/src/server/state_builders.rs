//! Builders for the HTTP state ports.
//!
//! With a database pool every port is backed by its Diesel adapter; without
//! one the fixture state is served so the API can be explored offline.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use parkmap::domain::ports::{BoundaryRepository, ParkMapQuery, ParkRepository};
use parkmap::domain::{CredentialsLoginService, ParkMapService, VisitService};
use parkmap::inbound::http::state::HttpState;
use parkmap::outbound::cache::CachedBoundaryRepository;
use parkmap::outbound::persistence::{
    DbPool, DieselBoundaryRepository, DieselParkRepository, DieselUserCredentialsRepository,
    DieselVisitRepository,
};

use super::ServerConfig;

/// Wrap `boundaries` in the TTL cache when one is configured.
fn park_map_query<B, P>(
    boundaries: Arc<B>,
    parks: Arc<P>,
    cache_ttl: Option<Duration>,
) -> Arc<dyn ParkMapQuery>
where
    B: BoundaryRepository + 'static,
    P: ParkRepository + 'static,
{
    match cache_ttl {
        Some(ttl) => {
            info!(ttl_secs = ttl.as_secs(), "boundary cache enabled");
            let cached = CachedBoundaryRepository::new(boundaries, Arc::new(DefaultClock), ttl);
            Arc::new(ParkMapService::new(Arc::new(cached), parks))
        }
        None => Arc::new(ParkMapService::new(boundaries, parks)),
    }
}

fn database_state(pool: &DbPool, cache_ttl: Option<Duration>) -> HttpState {
    HttpState::new(
        Arc::new(CredentialsLoginService::new(Arc::new(
            DieselUserCredentialsRepository::new(pool.clone()),
        ))),
        park_map_query(
            Arc::new(DieselBoundaryRepository::new(pool.clone())),
            Arc::new(DieselParkRepository::new(pool.clone())),
            cache_ttl,
        ),
        Arc::new(VisitService::new(Arc::new(DieselVisitRepository::new(
            pool.clone(),
        )))),
    )
}

/// Build the shared HTTP state from the configured pool, or fixtures.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => database_state(pool, config.boundary_cache_ttl),
        None => {
            info!("no database configured; serving fixtures");
            HttpState::fixtures()
        }
    };
    web::Data::new(state)
}
