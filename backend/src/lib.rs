//! Park visitation map backend.
//!
//! Layers follow a hexagonal layout: [`domain`] holds entities, services and
//! ports; [`inbound`] adapts HTTP requests onto the driving ports;
//! [`outbound`] implements the driven ports over PostGIS and an in-process
//! cache.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
