//! Authentication API handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    Json,
};

use super::cookie::SessionCookie;
use super::dto::{
    EditProfileRequest, LoginRequest, LoginResponse, RegisterRequest, UpdatePasswordRequest,
    UserInfo, UserProfile,
};
use crate::application::{RegisterUser, UserService};
use crate::interfaces::http::common::{
    ApiError, ApiResponse, ApiResult, MessageResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: UserService,
    pub cookie: SessionCookie,
}

type SetCookie = [(header::HeaderName, String); 1];

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserInfo>),
        (status = 400, description = "Invalid username, short password or user already exists")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserInfo>>)> {
    let user = state
        .users
        .register(RegisterUser {
            username: request.username,
            email: request.email,
            full_name: request.full_name,
            password: request.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserInfo::from(&user))),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login; the token is also set as a cookie", body = ApiResponse<LoginResponse>),
        (status = 400, description = "User not found or invalid credentials"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(SetCookie, Json<ApiResponse<LoginResponse>>)> {
    let auth = state.users.login(&request.email, &request.password).await?;

    let cookie = state.cookie.issue(&auth.token);
    let response = LoginResponse {
        access_token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
        user: UserProfile::from(&auth.user),
    };

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::success(response)),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    responses(
        (status = 200, description = "Logged out; the session cookie is cleared", body = ApiResponse<MessageResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AuthHandlerState>,
    user: AuthenticatedUser,
) -> ApiResult<(SetCookie, Json<ApiResponse<MessageResponse>>)> {
    state.users.logout(&user.user_id).await?;

    Ok((
        [(header::SET_COOKIE, state.cookie.clear())],
        Json(ApiResponse::success(MessageResponse::new(
            "Logged out successfully",
        ))),
    ))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    responses(
        (status = 200, description = "Current user info", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<UserInfo>>> {
    let current = state.users.current_user(&user.user_id).await?;
    Ok(Json(ApiResponse::success(UserInfo::from(&current))))
}

#[utoipa::path(
    put,
    path = "/auth/edit",
    tag = "Authentication",
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    request_body = EditProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid field value"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn edit_profile(
    State(state): State<AuthHandlerState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<EditProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let update = request.into_update().map_err(ApiError::bad_request)?;
    let updated = state.users.update_profile(&user.user_id, update).await?;
    Ok(Json(ApiResponse::success(UserProfile::from(&updated))))
}

#[utoipa::path(
    put,
    path = "/auth/update-password",
    tag = "Authentication",
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = ApiResponse<MessageResponse>),
        (status = 400, description = "New password too short or old password incorrect"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_password(
    State(state): State<AuthHandlerState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<UpdatePasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .users
        .change_password(&user.user_id, &request.old_password, &request.new_password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password updated successfully",
    ))))
}

#[utoipa::path(
    delete,
    path = "/auth/delete",
    tag = "Authentication",
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    responses(
        (status = 200, description = "Account deleted; the session cookie is cleared", body = ApiResponse<MessageResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_account(
    State(state): State<AuthHandlerState>,
    user: AuthenticatedUser,
) -> ApiResult<(SetCookie, Json<ApiResponse<MessageResponse>>)> {
    state.users.delete_account(&user.user_id).await?;

    Ok((
        [(header::SET_COOKIE, state.cookie.clear())],
        Json(ApiResponse::success(MessageResponse::new(
            "User deleted successfully",
        ))),
    ))
}
