use crate::application::auth::tokens::{TokenPair, TokenService};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

pub struct RefreshTokenUseCase {
    token_service: Arc<TokenService>,
}

impl RefreshTokenUseCase {
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self { token_service }
    }

    pub async fn execute(&self, req: RefreshTokenRequest) -> Result<TokenPair, AppError> {
        self.token_service
            .rotate_refresh_token(&req.refresh_token)
            .await
    }
}
