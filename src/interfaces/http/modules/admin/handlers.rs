//! Admin API handlers
//!
//! Everything except request submission sits behind the session and
//! admin-role gates; see the router.

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{
    AdminRequestCreated, AdminRequestDto, AdminRequestListParams, ChangeRoleRequest,
    CreateAdminRequestRequest, ResolutionResponse, RoleChangeResponse,
    ValidateAdminRequestRequest,
};
use crate::application::{AdminRequestService, Resolution, RoleService, SubmitAdminRequest};
use crate::domain::{User, UserRole};
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson, ValidatedQuery};
use crate::interfaces::http::modules::auth::UserInfo;

#[derive(Clone)]
pub struct AdminHandlerState {
    pub requests: AdminRequestService,
    pub roles: RoleService,
}

#[utoipa::path(
    post,
    path = "/admin/create-admin-request",
    tag = "Admin",
    request_body = CreateAdminRequestRequest,
    responses(
        (status = 201, description = "Request queued for review", body = ApiResponse<AdminRequestCreated>),
        (status = 400, description = "Invalid username or user already exists")
    )
)]
pub async fn create_admin_request(
    State(state): State<AdminHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateAdminRequestRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AdminRequestCreated>>)> {
    let created = state
        .requests
        .submit(SubmitAdminRequest {
            username: request.username,
            email: request.email,
            full_name: request.full_name,
            password: request.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AdminRequestCreated::from(&created))),
    ))
}

#[utoipa::path(
    post,
    path = "/admin/validate-admin-request",
    tag = "Admin",
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    request_body = ValidateAdminRequestRequest,
    responses(
        (status = 201, description = "Approved; admin account created", body = ApiResponse<ResolutionResponse>),
        (status = 200, description = "Rejected; request deleted", body = ApiResponse<ResolutionResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No pending request with this id")
    )
)]
pub async fn validate_admin_request(
    State(state): State<AdminHandlerState>,
    ValidatedJson(request): ValidatedJson<ValidateAdminRequestRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ResolutionResponse>>)> {
    let resolution = state
        .requests
        .resolve(&request.request_id, request.is_valid)
        .await?;

    let (status, body) = match resolution {
        Resolution::Approved(user) => (
            StatusCode::CREATED,
            ResolutionResponse {
                message: "Admin user created successfully".to_string(),
                user: Some(UserInfo::from(&user)),
            },
        ),
        Resolution::Rejected => (
            StatusCode::OK,
            ResolutionResponse {
                message: "Admin request deleted successfully".to_string(),
                user: None,
            },
        ),
    };

    Ok((status, Json(ApiResponse::success(body))))
}

#[utoipa::path(
    get,
    path = "/admin/admin-requests",
    tag = "Admin",
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    params(AdminRequestListParams),
    responses(
        (status = 200, description = "Pending requests, newest first", body = ApiResponse<Vec<AdminRequestDto>>),
        (status = 400, description = "Invalid page or limit"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_admin_requests(
    State(state): State<AdminHandlerState>,
    ValidatedQuery(params): ValidatedQuery<AdminRequestListParams>,
) -> ApiResult<Json<ApiResponse<Vec<AdminRequestDto>>>> {
    let pending = state.requests.list_pending((&params).into()).await?;
    let items = pending.iter().map(AdminRequestDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

fn role_changed(user: User, role: UserRole) -> Json<ApiResponse<RoleChangeResponse>> {
    Json(ApiResponse::success(RoleChangeResponse {
        message: format!("User role changed to {} successfully", role),
        user: UserInfo::from(&user),
    }))
}

#[utoipa::path(
    put,
    path = "/admin/change-to-admin",
    tag = "Admin",
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<RoleChangeResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_to_admin(
    State(state): State<AdminHandlerState>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<ApiResponse<RoleChangeResponse>>> {
    let user = state.roles.change_to_admin(&request.user_id).await?;
    Ok(role_changed(user, UserRole::Admin))
}

#[utoipa::path(
    put,
    path = "/admin/change-to-paid",
    tag = "Admin",
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<RoleChangeResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_to_paid(
    State(state): State<AdminHandlerState>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<ApiResponse<RoleChangeResponse>>> {
    let user = state.roles.change_to_paid(&request.user_id).await?;
    Ok(role_changed(user, UserRole::Paid))
}

#[utoipa::path(
    put,
    path = "/admin/change-to-regular",
    tag = "Admin",
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<RoleChangeResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_to_regular(
    State(state): State<AdminHandlerState>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<ApiResponse<RoleChangeResponse>>> {
    let user = state.roles.change_to_regular(&request.user_id).await?;
    Ok(role_changed(user, UserRole::Regular))
}
