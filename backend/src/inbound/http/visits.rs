//! Visit submission.
//!
//! ```text
//! POST /api/v1/visits {"parkId":7,"rating":4,"note":"nice"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::VisitSubmission;
use crate::domain::{
    Error, ParkId, ParkValidationError, Rating, VisitNote, VisitValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/visits`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequest {
    #[schema(example = 7)]
    pub park_id: i32,
    #[schema(minimum = 1, maximum = 5, example = 4)]
    pub rating: i64,
    #[serde(default)]
    #[schema(max_length = 2000)]
    pub note: String,
}

impl TryFrom<VisitRequest> for VisitSubmission {
    type Error = Error;

    fn try_from(value: VisitRequest) -> Result<Self, Self::Error> {
        let park_id = ParkId::new(value.park_id).map_err(map_park_error)?;
        let rating = Rating::new(value.rating).map_err(map_visit_error)?;
        let note = VisitNote::new(value.note).map_err(map_visit_error)?;
        Ok(Self {
            park_id,
            rating,
            note,
        })
    }
}

fn map_park_error(err: ParkValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "parkId", "code": "invalid_park_id" }))
}

fn map_visit_error(err: VisitValidationError) -> Error {
    let (field, code) = match err {
        VisitValidationError::RatingOutOfRange(_) => ("rating", "rating_out_of_range"),
        VisitValidationError::NoteTooLong => ("note", "note_too_long"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Record a visit for the session user.
#[utoipa::path(
    post,
    path = "/api/v1/visits",
    request_body = VisitRequest,
    responses(
        (status = 201, description = "Visit recorded"),
        (status = 400, description = "Invalid submission", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Administrators cannot record visits", body = Error),
        (status = 404, description = "Unknown park", body = Error),
        (status = 409, description = "Visit already recorded", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["visits"],
    operation_id = "recordVisit"
)]
#[post("/visits")]
pub async fn record_visit(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<VisitRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user()?;
    let submission = VisitSubmission::try_from(payload.into_inner())?;
    state.visits.record_visit(&user, submission).await?;
    Ok(HttpResponse::Created().finish())
}
