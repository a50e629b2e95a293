use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::iso8601::option")]
    pub scheduled_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::iso8601::option")]
    pub archived_date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub scheduled_date: Option<OffsetDateTime>,
    pub archived_date: Option<OffsetDateTime>,
}

/// Visibility of an article relative to a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Scheduled in the future.
    Scheduled,
    /// Archived in the past.
    Archived,
    /// Neither pending nor archived.
    #[default]
    Published,
}

impl ArticleStatus {
    pub fn matches(self, article: &Article, now: OffsetDateTime) -> bool {
        match self {
            ArticleStatus::Scheduled => article.scheduled_date.is_some_and(|d| d > now),
            ArticleStatus::Archived => article.archived_date.is_some_and(|d| d < now),
            ArticleStatus::Published => {
                article.scheduled_date.is_none_or(|d| d < now)
                    && article.archived_date.is_none_or(|d| d > now)
            }
        }
    }
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create(&self, article: NewArticle) -> Result<Article, anyhow::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, anyhow::Error>;
    async fn find_by_status(
        &self,
        status: ArticleStatus,
        now: OffsetDateTime,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, anyhow::Error>;
    async fn set_archived_date(
        &self,
        id: Uuid,
        archived_date: Option<OffsetDateTime>,
    ) -> Result<Option<Article>, anyhow::Error>;
}
