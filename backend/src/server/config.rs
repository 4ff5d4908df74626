//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use parkmap::inbound::http::session_config::SessionSettings;
use parkmap::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) boundary_cache_ttl: Option<Duration>,
}

impl ServerConfig {
    /// Configuration with fixture-backed ports and no boundary cache.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            boundary_cache_ttl: None,
        }
    }

    /// Serve from the database behind `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Keep boundary layers in memory for `ttl`; `None` disables caching.
    #[must_use]
    pub fn with_boundary_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.boundary_cache_ttl = ttl;
        self
    }
}
