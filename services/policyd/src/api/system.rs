//! Liveness endpoints.
//!
//! Both handlers are side-effect free and never touch the policy store.
use crate::api::error::{ApiError, api_validation_error};
use crate::api::types::{HealthCheck, HealthResponse};
use axum::Json;
use axum::body::Bytes;

#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Greeting", body = String)
    )
)]
pub(crate) async fn root() -> &'static str {
    "Hello, World!"
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    request_body = HealthCheck,
    responses(
        (status = 200, description = "Echo of the supplied status", body = HealthResponse),
        (status = 400, description = "Malformed body", body = crate::api::types::ErrorResponse)
    )
)]
/// Echo the caller's `{status}` back as `{message: {status}}`.
///
/// An empty body is treated as `{"status": "ok"}` so plain probes succeed.
pub(crate) async fn health(body: Bytes) -> Result<Json<HealthResponse>, ApiError> {
    let check = if body.iter().all(u8::is_ascii_whitespace) {
        HealthCheck {
            status: "ok".to_string(),
        }
    } else {
        serde_json::from_slice(&body).map_err(|err| api_validation_error(&err.to_string()))?
    };
    Ok(Json(HealthResponse { message: check }))
}
