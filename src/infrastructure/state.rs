use crate::application::auth::otp::OtpService;
use crate::application::auth::tokens::TokenService;
use crate::application::rate_limit::RateLimiter;
use crate::domain::articles::ArticleRepository;
use crate::domain::auth::{AuthService, RefreshTokenRepository};
use crate::domain::otp::{CodeDelivery, CodeHasher, OneTimeCodeRepository};
use crate::domain::rate_limit::{RateLimitPolicy, RateLimitStore};
use crate::domain::users::UserRepository;
use crate::infrastructure::auth::JwtAuthService;
use crate::infrastructure::code_hasher::HmacCodeHasher;
use crate::infrastructure::config::{AppConfig, OtpConfig, SmsConfig};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::redis::{RedisPool, RedisRateLimitStore};
use crate::infrastructure::repositories::articles::PostgresArticleRepository;
use crate::infrastructure::repositories::one_time_codes::PostgresOneTimeCodeRepository;
use crate::infrastructure::repositories::refresh_tokens::PostgresRefreshTokenRepository;
use crate::infrastructure::repositories::users::PostgresUserRepository;
use crate::infrastructure::sms::{ConsoleSmsGateway, HttpSmsGateway};
use std::sync::Arc;

/// Storage and integration backends the services are assembled from.
pub struct AppComponents {
    pub users: Arc<dyn UserRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub codes: Arc<dyn OneTimeCodeRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub rate_limit_store: Arc<dyn RateLimitStore>,
    pub auth_service: Arc<dyn AuthService>,
    pub code_hasher: Arc<dyn CodeHasher>,
    pub code_delivery: Arc<dyn CodeDelivery>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    /// Absent when the rate limiter runs on an in-process store
    pub redis: Option<RedisPool>,
    pub users: Arc<dyn UserRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub otp_service: Arc<OtpService>,
    pub token_service: Arc<TokenService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub rate_limit: RateLimitPolicy,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        redis: Option<RedisPool>,
        components: AppComponents,
        otp: &OtpConfig,
        rate_limit: RateLimitPolicy,
    ) -> Self {
        let otp_service = OtpService::new(
            components.codes,
            components.users.clone(),
            components.code_hasher,
            components.code_delivery,
            otp,
        );
        let token_service = TokenService::new(
            components.auth_service,
            components.refresh_tokens,
            components.users.clone(),
        );

        Self {
            pool,
            redis,
            users: components.users,
            articles: components.articles,
            otp_service: Arc::new(otp_service),
            token_service: Arc::new(token_service),
            rate_limiter: Arc::new(RateLimiter::new(components.rate_limit_store)),
            rate_limit,
        }
    }

    /// Wire the Postgres, Redis and SMS backends described by `config`.
    pub fn from_config(pool: DbPool, redis: RedisPool, config: &AppConfig) -> anyhow::Result<Self> {
        let auth_service = JwtAuthService::new(
            config.auth.access_secret.as_bytes(),
            config.auth.refresh_secret.as_bytes(),
            config.auth.access_token_expiry,
            config.auth.refresh_token_expiry,
        )?;

        let components = AppComponents {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            articles: Arc::new(PostgresArticleRepository::new(pool.clone())),
            codes: Arc::new(PostgresOneTimeCodeRepository::new(pool.clone())),
            refresh_tokens: Arc::new(PostgresRefreshTokenRepository::new(pool.clone())),
            rate_limit_store: Arc::new(RedisRateLimitStore::new(redis.clone())),
            auth_service: Arc::new(auth_service),
            code_hasher: Arc::new(HmacCodeHasher::new(config.otp.secret.as_bytes())?),
            code_delivery: code_delivery(&config.sms)?,
        };

        Ok(Self::new(
            pool,
            Some(redis),
            components,
            &config.otp,
            config.rate_limit,
        ))
    }
}

fn code_delivery(sms: &SmsConfig) -> anyhow::Result<Arc<dyn CodeDelivery>> {
    match &sms.gateway_url {
        Some(url) => Ok(Arc::new(HttpSmsGateway::new(
            url.clone(),
            sms.api_key.clone(),
            sms.sender_id.clone(),
        )?)),
        None => {
            tracing::warn!("SMS_GATEWAY_URL not set, verification codes will be logged");
            Ok(Arc::new(ConsoleSmsGateway))
        }
    }
}
