use crate::domain::otp::OtpError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Message returned for every OTP verification failure, whatever the cause.
pub const CODE_INVALID_MESSAGE: &str = "Code is invalid";

/// Message returned for every token verification failure.
pub const CREDENTIALS_MESSAGE: &str = "Could not validate credentials";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Too many requests: {0}")]
    TooManyRequests(String),
    #[error(transparent)]
    Otp(#[from] OtpError),
    #[error("Code delivery failed: {0}")]
    DeliveryFailure(anyhow::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Token failures all collapse into the same response.
    pub fn credentials() -> Self {
        AppError::Unauthorized(CREDENTIALS_MESSAGE.to_string())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub status: u16,
    pub detail: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorDetail>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut bearer_challenge = false;

        let (status, message) = match self {
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => {
                bearer_challenge = true;
                (StatusCode::UNAUTHORIZED, msg)
            }
            AppError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            AppError::Otp(OtpError::AttemptsExceeded) => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many attempts. Please request a new code.".to_string(),
            ),
            AppError::Otp(_) => (StatusCode::UNAUTHORIZED, CODE_INVALID_MESSAGE.to_string()),
            AppError::DeliveryFailure(e) => {
                tracing::error!("Code delivery failed: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not deliver verification code".to_string(),
                )
            }
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            errors: vec![ErrorDetail {
                status: status.as_u16(),
                detail: message,
            }],
        };

        let mut response = (status, Json(body)).into_response();
        if bearer_challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
