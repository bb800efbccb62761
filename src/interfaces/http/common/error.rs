//! Unified API error handling
//!
//! Every failure is answered with the [`ApiResponse`] envelope. Internal
//! details are logged here and never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error};

use super::ApiResponse;
use crate::domain::DomainError;

/// Message sent to clients for every unexpected failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    TooManyRequests(String),

    /// Logged server-side; the client only sees [`INTERNAL_ERROR_MESSAGE`]
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity, .. } => ApiError::NotFound(format!("{} not found", entity)),
            DomainError::Validation(msg)
            | DomainError::Conflict(msg)
            | DomainError::InvalidCredentials(msg) => ApiError::BadRequest(msg),
            DomainError::Unexpected(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "Unexpected error while handling request");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => {
                let message = other.to_string();
                debug!(status = status.as_u16(), message = %message, "Client error");
                message
            }
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
