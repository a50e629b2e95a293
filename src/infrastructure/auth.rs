use crate::domain::auth::{
    ACCESS_TOKEN_TYPE, AuthService, Claims, REFRESH_TOKEN_TYPE, RefreshClaims,
};
use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

/// JWT Authentication Service using HS256 with one secret per token kind
pub struct JwtAuthService {
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtAuthService {
    /// Create a new JWT service from the two signing secrets.
    ///
    /// Fails if either secret is empty or both are the same, since a shared key
    /// would let a refresh token pass as an access token and vice versa.
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_token_expiry: i64,
        refresh_token_expiry: i64,
    ) -> Result<Self> {
        if access_secret.is_empty() || refresh_secret.is_empty() {
            anyhow::bail!("JWT secrets must not be empty");
        }
        if access_secret == refresh_secret {
            anyhow::bail!("Access and refresh tokens must be signed with distinct secrets");
        }

        Ok(Self {
            access_encoding_key: EncodingKey::from_secret(access_secret),
            access_decoding_key: DecodingKey::from_secret(access_secret),
            refresh_encoding_key: EncodingKey::from_secret(refresh_secret),
            refresh_decoding_key: DecodingKey::from_secret(refresh_secret),
            access_token_expiry,
            refresh_token_expiry,
        })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation
    }
}

impl AuthService for JwtAuthService {
    fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        let claims = Claims::new_access_token(user_id, self.access_token_expiry);

        encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to generate access token: {}", e))
    }

    fn generate_refresh_token(&self, user_id: Uuid, jti: Uuid, family: Uuid) -> Result<String> {
        let claims = RefreshClaims::new(user_id, jti, family, self.refresh_token_expiry);

        encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to generate refresh token: {}", e))
    }

    fn validate_access_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.access_decoding_key, &Self::validation())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            anyhow::bail!("Invalid token type: {}", token_data.claims.token_type);
        }

        Ok(token_data.claims)
    }

    fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims> {
        let token_data =
            decode::<RefreshClaims>(token, &self.refresh_decoding_key, &Self::validation())
                .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        if token_data.claims.token_type != REFRESH_TOKEN_TYPE {
            anyhow::bail!("Invalid token type: {}", token_data.claims.token_type);
        }

        Ok(token_data.claims)
    }

    fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    fn refresh_token_expiry(&self) -> i64 {
        self.refresh_token_expiry
    }
}
