//! OpenAPI schema aggregation for the policy API.
use crate::api::{
    enforce, members, rules, system,
    types::{
        DomainsResponse, EnforceRequest, EnforceResponse, ErrorResponse, GroupsResponse,
        HealthCheck, HealthResponse, MembersResponse, MessageResponse, PoliciesResponse,
        RoleRequest, RolesResponse, SubjectRequest,
    },
};
use axum::Json;
use utoipa::OpenApi;
use warden_policy::DecisionReason;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "policyd",
        version = "v1",
        description = "Domain-scoped RBAC policy HTTP API"
    ),
    paths(
        system::root,
        system::health,
        enforce::enforce,
        rules::list_domains,
        rules::list_roles,
        rules::list_policies,
        rules::list_groups,
        members::list_members,
        members::add_member,
        members::replace_member,
        members::remove_member
    ),
    components(schemas(
        ErrorResponse,
        MessageResponse,
        HealthCheck,
        HealthResponse,
        EnforceRequest,
        EnforceResponse,
        DecisionReason,
        RoleRequest,
        SubjectRequest,
        DomainsResponse,
        RolesResponse,
        MembersResponse,
        PoliciesResponse,
        GroupsResponse
    )),
    tags(
        (name = "system", description = "Liveness endpoints"),
        (name = "enforce", description = "Access decisions"),
        (name = "rules", description = "Stored rule listings"),
        (name = "members", description = "Role assignment per domain")
    )
)]
pub struct ApiDoc;

pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
