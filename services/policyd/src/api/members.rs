//! Role membership handlers for one domain.
//!
//! # Purpose
//! Lists, assigns, replaces, and removes a subject's roles in the domain
//! named by the path.
//!
//! # Key invariants
//! - Assigned roles must pass the configured whitelist before the engine is
//!   called.
//! - A mutation that changes nothing is reported as 400 `not_applied`.
use crate::api::error::{
    ApiError, api_assign_error, api_engine_error, api_not_applied, api_role_not_allowed,
};
use crate::api::json_body;
use crate::api::types::{MembersResponse, MessageResponse, RoleRequest, SubjectRequest};
use crate::app::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

#[utoipa::path(
    get,
    path = "/members/{domain}",
    tag = "members",
    params(("domain" = String, Path, description = "Domain")),
    responses(
        (status = 200, description = "Grouping rules in the domain", body = MembersResponse)
    )
)]
pub(crate) async fn list_members(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<MembersResponse>, ApiError> {
    let members = state
        .service
        .list_members(&domain)
        .await
        .map_err(|err| api_engine_error("failed to list members", &err))?;
    Ok(Json(MembersResponse {
        members: members.iter().map(|rule| rule.to_fields()).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/members/{domain}",
    tag = "members",
    params(("domain" = String, Path, description = "Domain")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role added", body = MessageResponse),
        (status = 400, description = "Role not allowed or already assigned", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn add_member(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    payload: Result<Json<RoleRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(payload)?;
    state
        .whitelist
        .validate(&req.role)
        .map_err(|err| api_role_not_allowed(&err))?;
    let added = state
        .service
        .assign_role(&req.subject, &req.role, &domain)
        .await
        .map_err(|err| api_assign_error("failed to add role", &err))?;
    if !added {
        return Err(api_not_applied("failed to add role"));
    }
    Ok(Json(MessageResponse::new("role added")))
}

#[utoipa::path(
    put,
    path = "/members/{domain}",
    tag = "members",
    params(("domain" = String, Path, description = "Domain")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Roles replaced", body = MessageResponse),
        (status = 400, description = "Role not allowed, user has no role, or nothing changed", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn replace_member(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    payload: Result<Json<RoleRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(payload)?;
    state
        .whitelist
        .validate(&req.role)
        .map_err(|err| api_role_not_allowed(&err))?;
    let replaced = state
        .service
        .replace_role(&req.subject, &req.role, &domain)
        .await
        .map_err(|err| api_assign_error("failed to update role", &err))?;
    if !replaced {
        return Err(api_not_applied("failed to update role"));
    }
    Ok(Json(MessageResponse::new("role updated")))
}

#[utoipa::path(
    delete,
    path = "/members/{domain}",
    tag = "members",
    params(("domain" = String, Path, description = "Domain")),
    request_body = SubjectRequest,
    responses(
        (status = 200, description = "Roles removed", body = MessageResponse),
        (status = 400, description = "User has no role in the domain", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn remove_member(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    payload: Result<Json<SubjectRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(payload)?;
    let removed = state
        .service
        .remove_all_roles(&req.subject, &domain)
        .await
        .map_err(|err| api_assign_error("failed to delete role", &err))?;
    if !removed {
        return Err(api_not_applied("failed to delete role"));
    }
    Ok(Json(MessageResponse::new("role deleted")))
}
