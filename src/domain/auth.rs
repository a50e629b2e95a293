use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub const ACCESS_TOKEN_TYPE: &str = "access";
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Default access token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 15 * 60;

/// Default refresh token lifetime: 30 days.
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 30 * 24 * 60 * 60;

/// Claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Token type: "access" or "refresh"
    #[serde(rename = "type")]
    pub token_type: String,
}

impl Claims {
    pub fn new_access_token(user_id: Uuid, expiry_seconds: i64) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self {
            sub: user_id.to_string(),
            iat: now,
            exp: now + expiry_seconds,
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        }
    }

    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow::anyhow!("Invalid user ID in claims: {}", e))
    }
}

/// Claims carried by refresh tokens: the access claims plus the token id and family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: String,
    /// Token id, primary key of the stored row
    pub jti: Uuid,
    /// Family shared by every token descended from one login
    pub family: Uuid,
}

impl RefreshClaims {
    pub fn new(user_id: Uuid, jti: Uuid, family: Uuid, expiry_seconds: i64) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self {
            sub: user_id.to_string(),
            iat: now,
            exp: now + expiry_seconds,
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            jti,
            family,
        }
    }

    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow::anyhow!("Invalid user ID in claims: {}", e))
    }
}

/// Refresh token entity
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_family: Uuid,
    pub parent_token_id: Option<Uuid>,
    pub revoked: bool,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// New refresh token for creation
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_family: Uuid,
    pub parent_token_id: Option<Uuid>,
    pub expires_at: OffsetDateTime,
}

/// Result of trying to consume a refresh token.
#[derive(Debug, Clone, PartialEq)]
pub enum RotationOutcome {
    /// The presented token was live; it is now revoked and `successor` was stored.
    Rotated { successor: RefreshToken },
    /// The presented token was unknown or already consumed. Every token of the
    /// family has been revoked; `revoked` counts the rows this call flipped.
    ReuseDetected { revoked: u64 },
}

/// Repository trait for refresh tokens
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Store a token that does not consume a predecessor (a family root).
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken>;

    /// Find a refresh token by its id (the `jti` claim)
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>>;

    /// Atomically consume `jti` in `family` and store `successor`, or revoke the
    /// whole family when `jti` is unknown, revoked or belongs elsewhere.
    async fn rotate(
        &self,
        jti: Uuid,
        family: Uuid,
        successor: NewRefreshToken,
    ) -> Result<RotationOutcome>;

    /// List a family oldest first.
    async fn find_by_family(&self, family: Uuid) -> Result<Vec<RefreshToken>>;
}

/// Signs and validates both token kinds. Implementations must use a different
/// key per kind so one cannot be forged from the other.
pub trait AuthService: Send + Sync {
    fn generate_access_token(&self, user_id: Uuid) -> Result<String>;

    fn generate_refresh_token(&self, user_id: Uuid, jti: Uuid, family: Uuid) -> Result<String>;

    fn validate_access_token(&self, token: &str) -> Result<Claims>;

    fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims>;

    fn access_token_expiry(&self) -> i64;

    fn refresh_token_expiry(&self) -> i64;
}
