//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every endpoint returns
//! the same `{code, message}` shape, and maps engine errors to statuses.
//!
//! # Key invariants and assumptions
//! - Error responses carry a stable `code` and a human-readable `message`.
//! - A subject with no role in the domain is a client error (400), not 404.
//!
//! # Security considerations
//! - Internal errors log details server-side but return generic messages.
use crate::api::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use warden_policy::{AssignError, EngineError, ValidationError};

/// Structured API error returned by handlers.
///
/// # Invariants
/// - `status` must match the semantics of `body.code`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

pub fn api_role_not_allowed(err: &ValidationError) -> ApiError {
    api_validation_error(&err.to_string())
}

/// Build a 400 error for a subject that holds no role in the domain.
pub fn api_user_not_found() -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "not_found", "user does not exist")
}

/// Build a 400 error for a mutation that changed nothing.
pub fn api_not_applied(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "not_applied", message)
}

/// Build a 500 Internal Server Error, logging the cause.
pub fn api_internal(message: &str, err: &dyn std::error::Error) -> ApiError {
    tracing::error!(error = %err, "policy storage error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

pub fn api_engine_error(message: &str, err: &EngineError) -> ApiError {
    api_internal(message, err)
}

/// Map an assignment failure to its HTTP shape.
pub fn api_assign_error(message: &str, err: &AssignError) -> ApiError {
    match err {
        AssignError::NotFound { .. } => api_user_not_found(),
        AssignError::PersistenceAfterMutation(source) => {
            tracing::error!(error = %source, "policy persist failed after mutation");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "persistence_after_mutation",
                "change could not be persisted",
            )
        }
        AssignError::Store(_) => api_internal(message, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_policy::StoreError;

    fn parse_error() -> StoreError {
        warden_policy::parse_policy("x, broken").expect_err("parse")
    }

    #[test]
    fn api_error_helpers_build_expected_codes() {
        let validation = api_validation_error("bad");
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.body.code, "validation_error");

        let missing = api_user_not_found();
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);
        assert_eq!(missing.body.code, "not_found");
        assert_eq!(missing.body.message, "user does not exist");

        let noop = api_not_applied("failed to add role");
        assert_eq!(noop.status, StatusCode::BAD_REQUEST);
        assert_eq!(noop.body.code, "not_applied");
    }

    #[test]
    fn assign_errors_map_to_distinct_codes() {
        let not_found = api_assign_error(
            "x",
            &AssignError::NotFound {
                subject: "bob".to_string(),
                domain: "teamX".to_string(),
            },
        );
        assert_eq!(not_found.body.code, "not_found");

        let persist = api_assign_error("x", &AssignError::PersistenceAfterMutation(parse_error()));
        assert_eq!(persist.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(persist.body.code, "persistence_after_mutation");

        let store = api_assign_error("failed to add role", &AssignError::Store(parse_error()));
        assert_eq!(store.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.body.code, "internal");
        assert_eq!(store.body.message, "failed to add role");
    }

    #[test]
    fn role_not_allowed_lists_whitelist() {
        let err = ValidationError::RoleNotAllowed {
            role: "admin".to_string(),
            allowed: vec!["owner".to_string(), "moderator".to_string()],
        };
        let api = api_role_not_allowed(&err);
        assert_eq!(api.body.code, "validation_error");
        assert_eq!(api.body.message, "role must be one of owner, moderator");
    }
}
