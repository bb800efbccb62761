//! Admin API DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::AdminRequest;
use crate::shared::PageRequest;

use crate::interfaces::http::modules::auth::UserInfo;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAdminRequestRequest {
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub full_name: Option<String>,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Returned on submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminRequestCreated {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&AdminRequest> for AdminRequestCreated {
    fn from(request: &AdminRequest) -> Self {
        Self {
            id: request.id.clone(),
            username: request.username.clone(),
            email: request.email.clone(),
        }
    }
}

/// Pending request as listed to admins
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminRequestDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_validated: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&AdminRequest> for AdminRequestDto {
    fn from(request: &AdminRequest) -> Self {
        Self {
            id: request.id.clone(),
            username: request.username.clone(),
            email: request.email.clone(),
            full_name: request.full_name.clone(),
            is_validated: request.is_validated,
            created_at: request.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateAdminRequestRequest {
    #[validate(length(min = 1, message = "requestId is required"))]
    pub request_id: String,
    /// `true` approves, `false` rejects
    pub is_valid: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResolutionResponse {
    pub message: String,
    /// The created admin account, on approval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleChangeResponse {
    pub message: String,
    pub user: UserInfo,
}

/// Pagination for the pending-request listing
#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
pub struct AdminRequestListParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u64,
    /// Items per page (1–100). Default: 10
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

impl From<&AdminRequestListParams> for PageRequest {
    fn from(params: &AdminRequestListParams) -> Self {
        PageRequest::new(params.page, params.limit)
    }
}
