use crate::domain::auth::{DEFAULT_ACCESS_TOKEN_EXPIRY, DEFAULT_REFRESH_TOKEN_EXPIRY};
use crate::domain::otp::{DEFAULT_CODE_TTL_SECS, DEFAULT_MAX_ATTEMPTS};
use crate::domain::rate_limit::RateLimitPolicy;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub secret: String,
    pub code_ttl_secs: i64,
    pub max_attempts: i32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            code_ttl_secs: DEFAULT_CODE_TTL_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SmsConfig {
    pub gateway_url: Option<String>,
    pub api_key: Option<String>,
    pub sender_id: Option<String>,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub port: u16,
    pub auth: AuthConfig,
    pub otp: OtpConfig,
    pub rate_limit: RateLimitPolicy,
    pub sms: SmsConfig,
    pub cors_allowed_origins: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            port: parsed_or("PORT", 3000),
            auth: AuthConfig {
                access_secret: required("AUTH_SECRET_KEY")?,
                refresh_secret: required("AUTH_REFRESH_SECRET_KEY")?,
                access_token_expiry: parsed_or("JWT_ACCESS_TOKEN_EXPIRY", DEFAULT_ACCESS_TOKEN_EXPIRY),
                refresh_token_expiry: parsed_or(
                    "JWT_REFRESH_TOKEN_EXPIRY",
                    DEFAULT_REFRESH_TOKEN_EXPIRY,
                ),
            },
            otp: OtpConfig {
                secret: required("OTP_SECRET_KEY")?,
                code_ttl_secs: parsed_or("OTP_CODE_TTL_SECS", DEFAULT_CODE_TTL_SECS),
                max_attempts: parsed_or("OTP_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
            },
            rate_limit: RateLimitPolicy {
                max_requests: parsed_or("RATE_LIMIT_MAX_REQUESTS", 5),
                window_seconds: parsed_or("RATE_LIMIT_WINDOW_SECS", 60),
            },
            sms: SmsConfig {
                gateway_url: optional("SMS_GATEWAY_URL"),
                api_key: optional("SMS_GATEWAY_API_KEY"),
                sender_id: optional("SMS_SENDER_ID"),
            },
            cors_allowed_origins: optional("CORS_ALLOWED_ORIGINS"),
        };

        if config.auth.access_secret == config.auth.refresh_secret {
            anyhow::bail!("AUTH_SECRET_KEY and AUTH_REFRESH_SECRET_KEY must differ");
        }

        Ok(config)
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{} must be set", key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
