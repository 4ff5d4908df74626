//! Backend entry-point: loads settings, opens the database pool and serves
//! the park map API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use parkmap::inbound::http::health::HealthState;
use parkmap::inbound::http::session_config::{BuildMode, session_settings_from_env};
use parkmap::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(fingerprint = %session.key_fingerprint(), "session key loaded");

    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let mut config = ServerConfig::new(session, bind_addr)
        .with_boundary_cache_ttl(settings.boundary_cache_ttl());

    if !settings.fixtures() {
        config = config.with_db_pool(open_pool(&settings).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    let outcome = server.await;
    health_state.mark_draining();
    outcome
}

async fn open_pool(settings: &AppSettings) -> io::Result<DbPool> {
    let database_url = settings.database_url();
    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .map_err(io::Error::other)?;
        info!("migrations applied");
    }
    let max_size = settings.pool_max_size().map_err(io::Error::other)?;
    DbPool::new(PoolConfig::new(database_url).with_max_size(max_size))
        .await
        .map_err(io::Error::other)
}
