use crate::application::auth::otp::OtpService;
use crate::application::auth::tokens::{TokenPair, TokenService};
use crate::application::rate_limit::RateLimiter;
use crate::domain::phone::{PhoneNumber, validate_phone_number};
use crate::domain::rate_limit::RateLimitPolicy;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[validate(custom(function = "validate_phone_number"))]
    #[schema(example = "+15551234567")]
    pub phone_number: String,

    #[validate(length(min = 1, max = 32, message = "Code is required"))]
    #[schema(example = "042917")]
    pub code: String,

    /// Display name stored when this login creates the account
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,
}

/// Exchanges a one-time code for a fresh token family.
pub struct LoginUseCase {
    rate_limiter: Arc<RateLimiter>,
    otp_service: Arc<OtpService>,
    token_service: Arc<TokenService>,
    policy: RateLimitPolicy,
}

impl LoginUseCase {
    pub fn new(
        rate_limiter: Arc<RateLimiter>,
        otp_service: Arc<OtpService>,
        token_service: Arc<TokenService>,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            rate_limiter,
            otp_service,
            token_service,
            policy,
        }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, client: &str, req: VerifyOtpRequest) -> Result<TokenPair, AppError> {
        let phone_number = PhoneNumber::parse(&req.phone_number)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        self.rate_limiter.admit(client, self.policy).await?;

        let user = self
            .otp_service
            .verify_code(&phone_number, &req.code, req.name)
            .await?;

        self.token_service.issue_token_pair(user.id, None, None).await
    }
}
