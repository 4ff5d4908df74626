//! Page-level documents.
//!
//! `/view` is the client's single entry point and is served with or without a
//! session; `/map` returns just the composed map for a logged-in user.

use actix_web::{get, web};

use crate::domain::{ComposedMap, Error, ViewState};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Everything the client renders for the current session.
#[utoipa::path(
    get,
    path = "/api/v1/view",
    responses(
        (status = 200, description = "Login form or authenticated page", body = ViewState),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["view"],
    operation_id = "currentView",
    security([])
)]
#[get("/view")]
pub async fn current_view(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ViewState>> {
    let user = session.current_user()?;
    Ok(web::Json(state.parks.view(user.as_ref()).await?))
}

/// Layers and markers for the session user.
#[utoipa::path(
    get,
    path = "/api/v1/map",
    responses(
        (status = 200, description = "Composed map", body = ComposedMap),
        (status = 401, description = "Not logged in", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["map"],
    operation_id = "composedMap"
)]
#[get("/map")]
pub async fn composed_map(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ComposedMap>> {
    let user = session.require_user()?;
    Ok(web::Json(state.parks.map(&user).await?))
}
