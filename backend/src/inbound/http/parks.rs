//! Map layer and park handlers.
//!
//! ```text
//! GET /api/v1/regions
//! GET /api/v1/parks/boundaries
//! GET /api/v1/parks
//! GET /api/v1/stats
//! ```
//!
//! Every route needs a session; `/stats` is further limited to administrators
//! by the query service.

use actix_web::{get, web};
use geojson::FeatureCollection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, ParkStatus, ParkVisitStat};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// A GeoJSON `FeatureCollection` served as-is.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct GeoJsonLayer(pub FeatureCollection);

/// Simplified region outlines as GeoJSON.
#[utoipa::path(
    get,
    path = "/api/v1/regions",
    responses(
        (status = 200, description = "Region FeatureCollection", body = GeoJsonLayer),
        (status = 401, description = "Not logged in", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["map"],
    operation_id = "listRegions"
)]
#[get("/regions")]
pub async fn regions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<GeoJsonLayer>> {
    session.require_user()?;
    Ok(web::Json(GeoJsonLayer(state.parks.regions().await?)))
}

/// Park polygons as GeoJSON.
#[utoipa::path(
    get,
    path = "/api/v1/parks/boundaries",
    responses(
        (status = 200, description = "Park FeatureCollection", body = GeoJsonLayer),
        (status = 401, description = "Not logged in", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["map"],
    operation_id = "listParkBoundaries"
)]
#[get("/parks/boundaries")]
pub async fn park_boundaries(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<GeoJsonLayer>> {
    session.require_user()?;
    Ok(web::Json(GeoJsonLayer(state.parks.park_boundaries().await?)))
}

/// Parks with the visit details visible to the session owner.
#[utoipa::path(
    get,
    path = "/api/v1/parks",
    responses(
        (status = 200, description = "Park rows", body = [ParkStatus]),
        (status = 401, description = "Not logged in", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["parks"],
    operation_id = "listParks"
)]
#[get("/parks")]
pub async fn list_parks(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ParkStatus>>> {
    let user = session.require_user()?;
    Ok(web::Json(state.parks.parks(&user).await?))
}

/// Visit counts per park, most visited first.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Visit counts", body = [ParkVisitStat]),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["parks"],
    operation_id = "parkStats"
)]
#[get("/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ParkVisitStat>>> {
    let user = session.require_user()?;
    Ok(web::Json(state.parks.stats(&user).await?))
}
