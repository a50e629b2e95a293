use crate::domain::phone::PhoneNumber;
use crate::domain::users::{DuplicatePhoneNumber, NewUser, UpdateUser, User, UserRepository};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: DbPool,
}

impl PostgresUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Surface a hit on the `phone_number` unique index as [`DuplicatePhoneNumber`].
fn map_unique_violation(e: sqlx::Error) -> anyhow::Error {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DuplicatePhoneNumber.into(),
        _ => e.into(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (phone_number, name)
            VALUES ($1, $2)
            RETURNING id, phone_number, name, created_at, updated_at
            "#,
        )
        .bind(new_user.phone_number.as_str())
        .bind(new_user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, anyhow::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, phone_number, name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_phone_number(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<User>, anyhow::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, phone_number, name, created_at, updated_at
            FROM users
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn upsert_by_phone_number(
        &self,
        phone_number: &PhoneNumber,
        name: Option<String>,
    ) -> Result<User, anyhow::Error> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (phone_number, name)
            VALUES ($1, $2)
            ON CONFLICT (phone_number) DO UPDATE
            SET phone_number = EXCLUDED.phone_number
            RETURNING id, phone_number, name, created_at, updated_at
            "#,
        )
        .bind(phone_number.as_str())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<User>, anyhow::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, phone_number, name, created_at, updated_at
            FROM users
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update(&self, id: Uuid, update: UpdateUser) -> Result<Option<User>, anyhow::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET phone_number = $2, name = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, phone_number, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.phone_number.as_str())
        .bind(update.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
