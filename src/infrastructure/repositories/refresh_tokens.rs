use crate::domain::auth::{NewRefreshToken, RefreshToken, RefreshTokenRepository, RotationOutcome};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::auth::RefreshTokenDbModel;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, token_family, parent_token_id, revoked, created_at, expires_at";

pub struct PostgresRefreshTokenRepository {
    pool: DbPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Serialize rotations of one family until the
    /// transaction ends. Unrelated families never wait on each other.
    async fn lock_family(tx: &mut Transaction<'_, Postgres>, family: Uuid) -> Result<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(family.to_string())
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn revoke_family_in(tx: &mut Transaction<'_, Postgres>, family: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE token_family = $1 AND revoked = FALSE
            "#,
        )
        .bind(family)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn insert_in(
        tx: &mut Transaction<'_, Postgres>,
        token: &NewRefreshToken,
    ) -> Result<RefreshToken> {
        let token_db = sqlx::query_as::<_, RefreshTokenDbModel>(&format!(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token_family, parent_token_id, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(token.id)
        .bind(token.user_id)
        .bind(token.token_family)
        .bind(token.parent_token_id)
        .bind(token.expires_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(token_db.into())
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken> {
        let mut tx = self.pool.begin().await?;
        Self::lock_family(&mut tx, token.token_family).await?;
        let created = Self::insert_in(&mut tx, &token).await?;
        tx.commit().await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>> {
        let token_db = sqlx::query_as::<_, RefreshTokenDbModel>(&format!(
            "SELECT {COLUMNS} FROM refresh_tokens WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token_db.map(|t| t.into()))
    }

    async fn rotate(
        &self,
        jti: Uuid,
        family: Uuid,
        successor: NewRefreshToken,
    ) -> Result<RotationOutcome> {
        let mut tx = self.pool.begin().await?;
        Self::lock_family(&mut tx, family).await?;

        // Only transition revoked:false -> true; zero rows means the token is
        // unknown, already consumed, or not part of this family.
        let consumed = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE id = $1 AND token_family = $2 AND revoked = FALSE
            "#,
        )
        .bind(jti)
        .bind(family)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if consumed == 0 {
            let revoked = Self::revoke_family_in(&mut tx, family).await?;
            tx.commit().await?;
            return Ok(RotationOutcome::ReuseDetected { revoked });
        }

        let successor = Self::insert_in(&mut tx, &successor).await?;
        tx.commit().await?;

        Ok(RotationOutcome::Rotated { successor })
    }

    async fn find_by_family(&self, family: Uuid) -> Result<Vec<RefreshToken>> {
        let tokens = sqlx::query_as::<_, RefreshTokenDbModel>(&format!(
            "SELECT {COLUMNS} FROM refresh_tokens WHERE token_family = $1 ORDER BY created_at, id"
        ))
        .bind(family)
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens.into_iter().map(Into::into).collect())
    }
}
