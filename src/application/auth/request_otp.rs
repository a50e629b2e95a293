use crate::application::auth::otp::OtpService;
use crate::application::rate_limit::RateLimiter;
use crate::domain::phone::{PhoneNumber, validate_phone_number};
use crate::domain::rate_limit::RateLimitPolicy;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RequestOtpRequest {
    #[validate(custom(function = "validate_phone_number"))]
    #[schema(example = "+15551234567")]
    pub phone_number: String,
}

pub struct RequestOtpUseCase {
    rate_limiter: Arc<RateLimiter>,
    otp_service: Arc<OtpService>,
    policy: RateLimitPolicy,
}

impl RequestOtpUseCase {
    pub fn new(
        rate_limiter: Arc<RateLimiter>,
        otp_service: Arc<OtpService>,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            rate_limiter,
            otp_service,
            policy,
        }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, client: &str, req: RequestOtpRequest) -> Result<(), AppError> {
        let phone_number = PhoneNumber::parse(&req.phone_number)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        self.rate_limiter.admit(client, self.policy).await?;
        self.otp_service.request_code(&phone_number).await
    }
}
