use crate::domain::auth::{AuthService, NewRefreshToken, RefreshTokenRepository, RotationOutcome};
use crate::domain::users::{User, UserRepository};
use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues, verifies and rotates JWT pairs.
pub struct TokenService {
    auth_service: Arc<dyn AuthService>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    users: Arc<dyn UserRepository>,
}

impl TokenService {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            auth_service,
            refresh_tokens,
            users,
        }
    }

    async fn existing_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(%user_id, "Token subject does not resolve to a user");
            AppError::credentials()
        })
    }

    fn new_refresh_token(
        &self,
        user_id: Uuid,
        parent_token_id: Option<Uuid>,
        token_family: Uuid,
    ) -> NewRefreshToken {
        NewRefreshToken {
            id: Uuid::new_v4(),
            user_id,
            token_family,
            parent_token_id,
            expires_at: OffsetDateTime::now_utc()
                + Duration::seconds(self.auth_service.refresh_token_expiry()),
        }
    }

    fn sign_pair(&self, token: &NewRefreshToken) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.auth_service.generate_access_token(token.user_id)?,
            refresh_token: self.auth_service.generate_refresh_token(
                token.user_id,
                token.id,
                token.token_family,
            )?,
        })
    }

    /// Issue an access/refresh pair. Without a family this roots a new one.
    #[tracing::instrument(skip(self))]
    pub async fn issue_token_pair(
        &self,
        user_id: Uuid,
        parent_token_id: Option<Uuid>,
        token_family: Option<Uuid>,
    ) -> Result<TokenPair, AppError> {
        self.existing_user(user_id).await?;

        let token = self.new_refresh_token(
            user_id,
            parent_token_id,
            token_family.unwrap_or_else(Uuid::new_v4),
        );
        let pair = self.sign_pair(&token)?;
        self.refresh_tokens.create(token).await?;

        Ok(pair)
    }

    /// Resolve the user behind an access token.
    pub async fn verify_access_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.auth_service.validate_access_token(token).map_err(|e| {
            tracing::debug!("Access token rejected: {}", e);
            AppError::credentials()
        })?;
        let user_id = claims.user_id().map_err(|_| AppError::credentials())?;

        self.existing_user(user_id).await
    }

    /// Consume a refresh token and hand out its successor pair.
    ///
    /// Presenting a token that was already consumed, or one the store does not
    /// know, revokes its entire family.
    #[tracing::instrument(skip_all)]
    pub async fn rotate_refresh_token(&self, token: &str) -> Result<TokenPair, AppError> {
        let claims = self.auth_service.validate_refresh_token(token).map_err(|e| {
            tracing::debug!("Refresh token rejected: {}", e);
            AppError::credentials()
        })?;
        let user_id = claims.user_id().map_err(|_| AppError::credentials())?;

        let successor = self.new_refresh_token(user_id, Some(claims.jti), claims.family);
        let pair = self.sign_pair(&successor)?;

        match self
            .refresh_tokens
            .rotate(claims.jti, claims.family, successor)
            .await?
        {
            RotationOutcome::Rotated { .. } => {}
            RotationOutcome::ReuseDetected { revoked } => {
                tracing::warn!(
                    %user_id,
                    family = %claims.family,
                    jti = %claims.jti,
                    revoked,
                    "Refresh token reuse detected, family revoked"
                );
                return Err(AppError::credentials());
            }
        }

        // A deleted user leaves a stored successor nobody can redeem
        self.existing_user(user_id).await?;

        Ok(pair)
    }
}
