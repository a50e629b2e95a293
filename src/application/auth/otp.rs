use crate::domain::otp::{
    CODE_LENGTH, CodeDelivery, CodeHasher, OneTimeCodeRepository, OtpError, UpsertOneTimeCode,
};
use crate::domain::phone::PhoneNumber;
use crate::domain::users::{User, UserRepository};
use crate::infrastructure::config::OtpConfig;
use crate::shared::error::AppError;
use rand::{Rng, rngs::OsRng};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};

/// Uniformly random numeric code of `CODE_LENGTH` digits, zero padded.
pub fn generate_code() -> String {
    let upper = 10u32.pow(CODE_LENGTH as u32);
    let value = OsRng.gen_range(0..upper);
    format!("{:0width$}", value, width = CODE_LENGTH)
}

/// Issues and checks one-time codes.
pub struct OtpService {
    codes: Arc<dyn OneTimeCodeRepository>,
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CodeHasher>,
    delivery: Arc<dyn CodeDelivery>,
    code_ttl: Duration,
    max_attempts: i32,
}

impl OtpService {
    pub fn new(
        codes: Arc<dyn OneTimeCodeRepository>,
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CodeHasher>,
        delivery: Arc<dyn CodeDelivery>,
        config: &OtpConfig,
    ) -> Self {
        Self {
            codes,
            users,
            hasher,
            delivery,
            code_ttl: Duration::seconds(config.code_ttl_secs),
            max_attempts: config.max_attempts,
        }
    }

    /// Replace any code held for `phone_number` with a fresh one and send it.
    ///
    /// The write stays uncommitted until delivery succeeds, so a failed send leaves
    /// the previous row (if any) in place.
    #[tracing::instrument(skip_all, fields(phone_number = %phone_number))]
    pub async fn request_code(&self, phone_number: &PhoneNumber) -> Result<(), AppError> {
        let code = generate_code();
        let code_hash = self.hasher.hash_code(phone_number, &code)?;

        let pending = self
            .codes
            .upsert(UpsertOneTimeCode {
                phone_number: phone_number.clone(),
                code_hash,
                expires_at: OffsetDateTime::now_utc() + self.code_ttl,
            })
            .await?;

        if let Err(e) = self.delivery.deliver(phone_number, &code).await {
            drop(pending);
            return Err(AppError::DeliveryFailure(e));
        }

        pending.commit().await?;
        tracing::debug!("Verification code issued");

        Ok(())
    }

    /// Check `candidate` against the stored code and, on success, return the user
    /// owning `phone_number`, creating it with `name` on first login.
    #[tracing::instrument(skip_all, fields(phone_number = %phone_number))]
    pub async fn verify_code(
        &self,
        phone_number: &PhoneNumber,
        candidate: &str,
        name: Option<String>,
    ) -> Result<User, AppError> {
        let now = OffsetDateTime::now_utc();

        let stored = self
            .codes
            .find_by_phone_number(phone_number)
            .await?
            .ok_or_else(|| reject(OtpError::CodeNotFound))?;

        if stored.is_expired(now) {
            return Err(reject(OtpError::CodeExpired));
        }
        if stored.used {
            return Err(reject(OtpError::CodeAlreadyUsed));
        }
        if stored.attempts >= self.max_attempts {
            return Err(reject(OtpError::AttemptsExceeded));
        }

        if !self
            .hasher
            .verify_code(phone_number, candidate, &stored.code_hash)?
        {
            // The snapshot above may be stale: only guesses that win a slot under the
            // ceiling count as invalid, the rest are classified from the current row.
            return match self
                .codes
                .record_failed_attempt(phone_number, &stored.code_hash, self.max_attempts)
                .await?
            {
                Some(attempts) => {
                    tracing::debug!(attempts, "Failed attempt recorded");
                    Err(reject(OtpError::CodeInvalid))
                }
                None => Err(reject(self.classify_lost_race(phone_number).await?)),
            };
        }

        // A concurrent verify, re-request or failed attempt may have changed the row
        // since it was read; only one caller can flip `used`.
        if !self
            .codes
            .mark_used(phone_number, &stored.code_hash, self.max_attempts)
            .await?
        {
            return Err(reject(self.classify_lost_race(phone_number).await?));
        }

        let user = self
            .users
            .upsert_by_phone_number(phone_number, name)
            .await?;
        tracing::info!(user_id = %user.id, "Verification code accepted");

        Ok(user)
    }

    async fn classify_lost_race(&self, phone_number: &PhoneNumber) -> Result<OtpError, AppError> {
        let now = OffsetDateTime::now_utc();
        Ok(match self.codes.find_by_phone_number(phone_number).await? {
            None => OtpError::CodeNotFound,
            Some(code) if code.used => OtpError::CodeAlreadyUsed,
            Some(code) if code.attempts >= self.max_attempts => OtpError::AttemptsExceeded,
            Some(code) if code.is_expired(now) => OtpError::CodeExpired,
            Some(_) => OtpError::CodeInvalid,
        })
    }
}

fn reject(reason: OtpError) -> AppError {
    tracing::warn!(%reason, "Code verification rejected");
    AppError::Otp(reason)
}
