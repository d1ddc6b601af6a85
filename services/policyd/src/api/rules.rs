//! Read-only views over the stored rules.
use crate::api::error::{ApiError, api_engine_error};
use crate::api::types::{DomainsResponse, GroupsResponse, PoliciesResponse, RolesResponse};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/domain",
    tag = "rules",
    responses(
        (status = 200, description = "Distinct domains in any rule", body = DomainsResponse)
    )
)]
pub(crate) async fn list_domains(
    State(state): State<AppState>,
) -> Result<Json<DomainsResponse>, ApiError> {
    let domains = state
        .service
        .list_domains()
        .await
        .map_err(|err| api_engine_error("failed to list domains", &err))?;
    Ok(Json(DomainsResponse {
        domains: domains.into_iter().collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/roles",
    tag = "rules",
    responses(
        (status = 200, description = "Distinct roles held by anyone", body = RolesResponse)
    )
)]
pub(crate) async fn list_roles(
    State(state): State<AppState>,
) -> Result<Json<RolesResponse>, ApiError> {
    let roles = state
        .service
        .list_roles()
        .await
        .map_err(|err| api_engine_error("failed to list roles", &err))?;
    Ok(Json(RolesResponse {
        roles: roles.into_iter().collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/policies",
    tag = "rules",
    responses(
        (status = 200, description = "All permission rules", body = PoliciesResponse)
    )
)]
pub(crate) async fn list_policies(
    State(state): State<AppState>,
) -> Result<Json<PoliciesResponse>, ApiError> {
    let rules = state
        .service
        .list_permission_rules()
        .await
        .map_err(|err| api_engine_error("failed to list policies", &err))?;
    Ok(Json(PoliciesResponse {
        policies: rules.iter().map(|rule| rule.to_fields()).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/groups",
    tag = "rules",
    responses(
        (status = 200, description = "All grouping rules", body = GroupsResponse)
    )
)]
pub(crate) async fn list_groups(
    State(state): State<AppState>,
) -> Result<Json<GroupsResponse>, ApiError> {
    let rules = state
        .service
        .list_grouping_rules()
        .await
        .map_err(|err| api_engine_error("failed to list groups", &err))?;
    Ok(Json(GroupsResponse {
        groups: rules.iter().map(|rule| rule.to_fields()).collect(),
    }))
}
