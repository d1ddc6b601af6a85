//! Policy service HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the shared request-body helper.
pub mod enforce;
pub mod error;
pub mod members;
pub mod openapi;
pub mod rules;
pub mod system;
pub mod types;

use crate::api::error::{ApiError, api_validation_error};
use axum::Json;
use axum::extract::rejection::JsonRejection;

/// Unwrap a JSON body, turning any rejection into a 400 `validation_error`.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(api_validation_error(&rejection.body_text())),
    }
}
