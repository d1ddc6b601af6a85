//! HTTP API request/response types.
//!
//! # Purpose
//! Defines payload shapes for the policy REST API and OpenAPI schema
//! generation. Rule tuples are rendered as string arrays in stored field
//! order.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use warden_policy::DecisionReason;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthCheck {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthResponse {
    pub message: HealthCheck,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct EnforceRequest {
    pub subject: String,
    pub domain: String,
    pub object: String,
    pub action: String,
}

/// Allowed decision: `message` is the deciding rule as
/// `[subject, domain, object, action, effect]`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct EnforceResponse {
    pub message: Vec<String>,
    pub reason: DecisionReason,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RoleRequest {
    pub subject: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SubjectRequest {
    pub subject: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DomainsResponse {
    pub domains: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RolesResponse {
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MembersResponse {
    pub members: Vec<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct PoliciesResponse {
    pub policies: Vec<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct GroupsResponse {
    pub groups: Vec<Vec<String>>,
}
