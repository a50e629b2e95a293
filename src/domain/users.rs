use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::phone::PhoneNumber;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub phone_number: String,
    pub name: Option<String>,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    pub updated_at: OffsetDateTime,
}

/// Raised by `create` and `update` when the phone number is already owned by
/// another user. Repositories report it from the unique index, so it also covers
/// writes that race past a prior lookup.
#[derive(Debug, thiserror::Error)]
#[error("phone number already belongs to another user")]
pub struct DuplicatePhoneNumber;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub phone_number: PhoneNumber,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub phone_number: PhoneNumber,
    pub name: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, anyhow::Error>;
    async fn find_by_phone_number(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<User>, anyhow::Error>;
    /// Insert a user for `phone_number`, or return the existing one untouched.
    async fn upsert_by_phone_number(
        &self,
        phone_number: &PhoneNumber,
        name: Option<String>,
    ) -> Result<User, anyhow::Error>;
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<User>, anyhow::Error>;
    async fn update(&self, id: Uuid, update: UpdateUser) -> Result<Option<User>, anyhow::Error>;
    async fn delete(&self, id: Uuid) -> Result<bool, anyhow::Error>;
}
