use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::phone::PhoneNumber;

/// Number of digits in a generated code.
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of a code, in seconds.
pub const DEFAULT_CODE_TTL_SECS: i64 = 5 * 60;

/// Default number of wrong submissions tolerated per code.
pub const DEFAULT_MAX_ATTEMPTS: i32 = 5;

/// Reasons a verification attempt fails. Clients only ever see a single
/// generic message for these; the variants exist for logging and tests.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OtpError {
    #[error("no code was requested for this phone number")]
    CodeNotFound,
    #[error("code has expired")]
    CodeExpired,
    #[error("code was already used")]
    CodeAlreadyUsed,
    #[error("too many failed attempts")]
    AttemptsExceeded,
    #[error("code does not match")]
    CodeInvalid,
}

/// Stored one-time code. Only the keyed hash of the code is ever persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct OneTimeCode {
    pub phone_number: String,
    pub code_hash: String,
    pub expires_at: OffsetDateTime,
    pub attempts: i32,
    pub used: bool,
}

impl OneTimeCode {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

/// Values written when a code is (re)issued. Attempts and the used flag are
/// always reset by the store.
#[derive(Debug, Clone)]
pub struct UpsertOneTimeCode {
    pub phone_number: PhoneNumber,
    pub code_hash: String,
    pub expires_at: OffsetDateTime,
}

/// An uncommitted code write. Dropping it without calling `commit` discards the write.
#[async_trait]
pub trait PendingOneTimeCode: Send {
    async fn commit(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait OneTimeCodeRepository: Send + Sync {
    /// Insert or replace the code for a phone number, keyed by the phone number.
    async fn upsert(&self, code: UpsertOneTimeCode) -> Result<Box<dyn PendingOneTimeCode>>;

    async fn find_by_phone_number(&self, phone_number: &PhoneNumber)
    -> Result<Option<OneTimeCode>>;

    /// Charge one failed attempt to the row only if it still holds `code_hash`, is
    /// unused and is below `max_attempts`, returning the new count. `None` means the
    /// ceiling was already reached, the code was used, or it was replaced.
    async fn record_failed_attempt(
        &self,
        phone_number: &PhoneNumber,
        code_hash: &str,
        max_attempts: i32,
    ) -> Result<Option<i32>>;

    /// Flip `used` to true only if the row still holds `code_hash`, is unused and is
    /// below `max_attempts`. Returns whether this call performed the transition.
    async fn mark_used(
        &self,
        phone_number: &PhoneNumber,
        code_hash: &str,
        max_attempts: i32,
    ) -> Result<bool>;
}

/// Keyed one-way digest of codes.
pub trait CodeHasher: Send + Sync {
    fn hash_code(&self, phone_number: &PhoneNumber, code: &str) -> Result<String>;

    /// Constant-time comparison of `code` against a stored digest.
    fn verify_code(&self, phone_number: &PhoneNumber, code: &str, code_hash: &str) -> Result<bool>;
}

/// Out-of-band channel that hands the plaintext code to the phone owner.
#[async_trait]
pub trait CodeDelivery: Send + Sync {
    async fn deliver(&self, phone_number: &PhoneNumber, code: &str) -> Result<()>;
}
