use crate::application::auth::login::{LoginUseCase, VerifyOtpRequest};
use crate::application::auth::refresh::{RefreshTokenRequest, RefreshTokenUseCase};
use crate::application::auth::request_otp::{RequestOtpRequest, RequestOtpUseCase};
use crate::application::auth::tokens::TokenPair;
use crate::domain::users::User;
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::{AuthUser, ClientIdentity};
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::validation::ValidatedJson;
use axum::{Json, extract::State, http::StatusCode};

/// Send a one-time code to a phone number
#[utoipa::path(
    post,
    path = "/auth/request-otp",
    request_body = RequestOtpRequest,
    responses(
        (status = 200, description = "Code sent"),
        (status = 422, description = "Invalid phone number", body = ErrorResponse),
        (status = 429, description = "Rate limited", body = ErrorResponse),
        (status = 500, description = "Code could not be delivered", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn request_otp(
    State(state): State<AppState>,
    ClientIdentity(client): ClientIdentity,
    ValidatedJson(req): ValidatedJson<RequestOtpRequest>,
) -> Result<StatusCode, AppError> {
    let use_case = RequestOtpUseCase::new(
        state.rate_limiter.clone(),
        state.otp_service.clone(),
        state.rate_limit,
    );

    use_case.execute(&client, req).await?;

    Ok(StatusCode::OK)
}

/// Exchange a one-time code for an access/refresh token pair
#[utoipa::path(
    post,
    path = "/auth/token",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Code accepted", body = TokenPair),
        (status = 401, description = "Code is invalid", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many attempts or requests", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    ClientIdentity(client): ClientIdentity,
    ValidatedJson(req): ValidatedJson<VerifyOtpRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let use_case = LoginUseCase::new(
        state.rate_limiter.clone(),
        state.otp_service.clone(),
        state.token_service.clone(),
        state.rate_limit,
    );

    Ok(Json(use_case.execute(&client, req).await?))
}

/// Return the user owning the presented access token
#[utoipa::path(
    get,
    path = "/auth/token/verify",
    responses(
        (status = 200, description = "Token is valid", body = User),
        (status = 401, description = "Could not validate credentials", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn verify_token(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// Rotate a refresh token
#[utoipa::path(
    post,
    path = "/auth/token/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token rotated", body = TokenPair),
        (status = 401, description = "Could not validate credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let use_case = RefreshTokenUseCase::new(state.token_service.clone());

    Ok(Json(use_case.execute(req).await?))
}
