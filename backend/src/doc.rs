//! OpenAPI document for the park map API.
//!
//! Registers every `/api/v1` handler and the health probes, the JSON schemas
//! they exchange, and the session cookie security scheme. Served by Swagger
//! UI in debug builds and printed by `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    ComposedMap, Error, ErrorCode, ParkOption, ParkStatus, ParkVisitInfo, ParkVisitStat, Role,
    ViewState,
};
use crate::inbound::http::parks::GeoJsonLayer;
use crate::inbound::http::users::{LoginRequest, SessionUser};
use crate::inbound::http::visits::VisitRequest;

struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default)
            .add_security_scheme(
                "SessionCookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "session",
                    "Session cookie issued by POST /api/v1/login.",
                ))),
            );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieAddon),
    info(
        title = "parkmap",
        description = "Park visitation map: login, map layers, park status, visit recording and statistics."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_session,
        crate::inbound::http::view::current_view,
        crate::inbound::http::view::composed_map,
        crate::inbound::http::parks::regions,
        crate::inbound::http::parks::park_boundaries,
        crate::inbound::http::parks::list_parks,
        crate::inbound::http::parks::stats,
        crate::inbound::http::visits::record_visit,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        SessionUser,
        Role,
        VisitRequest,
        GeoJsonLayer,
        ParkStatus,
        ParkVisitInfo,
        ParkVisitStat,
        ParkOption,
        ComposedMap,
        ViewState,
    )),
    tags(
        (name = "session", description = "Login, logout and the session user"),
        (name = "view", description = "Documents the client renders"),
        (name = "map", description = "Map layers and composition"),
        (name = "parks", description = "Park rows and statistics"),
        (name = "visits", description = "Visit recording"),
        (name = "health", description = "Orchestrator probes")
    )
)]
pub struct ApiDoc;
