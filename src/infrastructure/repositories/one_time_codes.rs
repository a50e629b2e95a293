use crate::domain::otp::{OneTimeCode, OneTimeCodeRepository, PendingOneTimeCode, UpsertOneTimeCode};
use crate::domain::phone::PhoneNumber;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::otp::OneTimeCodeDbModel;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

pub struct PostgresOneTimeCodeRepository {
    pool: DbPool,
}

impl PostgresOneTimeCodeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Upper bound on how long an uncommitted code write may sit idle while the code is
/// being delivered. Postgres ends the session past this, releasing the row lock and
/// the pooled connection. Must exceed the SMS request timeout.
pub const PENDING_CODE_HOLD_SECS: u64 = 15;

/// Upsert held open in a transaction; rolled back by sqlx when dropped.
struct PgPendingOneTimeCode {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl PendingOneTimeCode for PgPendingOneTimeCode {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl OneTimeCodeRepository for PostgresOneTimeCodeRepository {
    async fn upsert(&self, code: UpsertOneTimeCode) -> Result<Box<dyn PendingOneTimeCode>> {
        let mut tx = self.pool.begin().await?;

        // SET LOCAL takes no bind parameters
        sqlx::query(&format!(
            "SET LOCAL idle_in_transaction_session_timeout = '{}s'",
            PENDING_CODE_HOLD_SECS
        ))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO one_time_codes (phone_number, code_hash, expires_at, attempts, used)
            VALUES ($1, $2, $3, 0, FALSE)
            ON CONFLICT (phone_number) DO UPDATE
            SET code_hash = EXCLUDED.code_hash,
                expires_at = EXCLUDED.expires_at,
                attempts = 0,
                used = FALSE
            "#,
        )
        .bind(code.phone_number.as_str())
        .bind(&code.code_hash)
        .bind(code.expires_at)
        .execute(&mut *tx)
        .await?;

        Ok(Box::new(PgPendingOneTimeCode { tx }))
    }

    async fn find_by_phone_number(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<OneTimeCode>> {
        let code = sqlx::query_as::<_, OneTimeCodeDbModel>(
            r#"
            SELECT phone_number, code_hash, expires_at, attempts, used
            FROM one_time_codes
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(code.map(Into::into))
    }

    async fn record_failed_attempt(
        &self,
        phone_number: &PhoneNumber,
        code_hash: &str,
        max_attempts: i32,
    ) -> Result<Option<i32>> {
        let attempts = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE one_time_codes
            SET attempts = attempts + 1
            WHERE phone_number = $1
              AND code_hash = $2
              AND used = FALSE
              AND attempts < $3
            RETURNING attempts
            "#,
        )
        .bind(phone_number.as_str())
        .bind(code_hash)
        .bind(max_attempts)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempts)
    }

    async fn mark_used(
        &self,
        phone_number: &PhoneNumber,
        code_hash: &str,
        max_attempts: i32,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE one_time_codes
            SET used = TRUE
            WHERE phone_number = $1
              AND code_hash = $2
              AND used = FALSE
              AND attempts < $3
              AND expires_at > NOW()
            "#,
        )
        .bind(phone_number.as_str())
        .bind(code_hash)
        .bind(max_attempts)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
