//! Authentication and role middleware for Axum
//!
//! Two gates, applied in order on protected routes:
//! [`auth_middleware`] verifies the session token and attaches an
//! [`AuthenticatedUser`]; [`require_role`] compares its role against the
//! route's required role. Both fail closed and never touch the store.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, SessionClaims};
use crate::interfaces::http::common::ApiError;

/// Authentication error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    InsufficientPermissions,
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MissingToken => ApiError::unauthorized("No token provided"),
            AuthError::InvalidToken => ApiError::unauthorized("Invalid token"),
            AuthError::InsufficientPermissions => ApiError::forbidden("Access denied"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Authentication state: verification key material and the session cookie name
#[derive(Clone, Debug)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub cookie_name: String,
}

/// Identity attached to the request once the token is verified
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            full_name: claims.full_name,
            role: claims.role,
        }
    }
}

/// Handlers behind [`auth_middleware`] take the user as an extractor.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

fn bearer_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

fn token_from_cookie_header<'a>(cookie_header: &'a str, cookie_name: &str) -> Option<&'a str> {
    cookie_header.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        if name.trim() == cookie_name && !value.trim().is_empty() {
            Some(value.trim())
        } else {
            None
        }
    })
}

/// Bearer token from `Authorization`, else the named session cookie
pub fn extract_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token);

    from_header.or_else(|| {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .find_map(|cookies| token_from_cookie_header(cookies, cookie_name))
    })
}

/// Verify the request's session token
pub fn authenticate(headers: &HeaderMap, state: &AuthState) -> Result<AuthenticatedUser, AuthError> {
    let token = extract_token(headers, &state.cookie_name).ok_or(AuthError::MissingToken)?;

    let claims = verify_token(token, &state.jwt_config).map_err(|e| {
        debug!("Session token rejected: {}", e);
        AuthError::InvalidToken
    })?;

    Ok(AuthenticatedUser::from_claims(claims))
}

/// Session authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &auth_state) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Role gate. Must run after [`auth_middleware`]; the state is the required role.
pub async fn require_role(
    State(required): State<UserRole>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthenticatedUser>() else {
        return AuthError::MissingToken.into_response();
    };

    if user.role != required {
        debug!(user_id = %user.user_id, role = %user.role, required = %required, "Role check failed");
        return AuthError::InsufficientPermissions.into_response();
    }

    next.run(request).await
}
