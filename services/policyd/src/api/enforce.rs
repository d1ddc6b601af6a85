use crate::api::error::{ApiError, api_engine_error};
use crate::api::json_body;
use crate::api::types::{EnforceRequest, EnforceResponse, MessageResponse};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[utoipa::path(
    post,
    path = "/enforce",
    tag = "enforce",
    request_body = EnforceRequest,
    responses(
        (status = 200, description = "Allowed; message is the deciding rule", body = EnforceResponse),
        (status = 403, description = "Denied", body = MessageResponse),
        (status = 400, description = "Malformed body", body = crate::api::types::ErrorResponse),
        (status = 500, description = "Policy could not be loaded", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn enforce(
    State(state): State<AppState>,
    payload: Result<Json<EnforceRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = json_body(payload)?;
    let decision = state
        .service
        .enforce(&req.subject, &req.domain, &req.object, &req.action)
        .await
        .map_err(|err| api_engine_error("failed to load policy", &err))?;
    if !decision.allowed {
        return Ok((StatusCode::FORBIDDEN, Json(MessageResponse::new("forbidden"))).into_response());
    }
    Ok(Json(EnforceResponse {
        message: decision.explanation(),
        reason: decision.reason,
    })
    .into_response())
}
