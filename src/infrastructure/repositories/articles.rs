use crate::domain::articles::{Article, ArticleRepository, ArticleStatus, NewArticle};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresArticleRepository {
    pool: DbPool,
}

impl PostgresArticleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn create(&self, article: NewArticle) -> Result<Article, anyhow::Error> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (title, content, scheduled_date, archived_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, scheduled_date, archived_date
            "#,
        )
        .bind(article.title)
        .bind(article.content)
        .bind(article.scheduled_date)
        .bind(article.archived_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(article)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, anyhow::Error> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, scheduled_date, archived_date
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    async fn find_by_status(
        &self,
        status: ArticleStatus,
        now: OffsetDateTime,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, anyhow::Error> {
        let condition = match status {
            ArticleStatus::Scheduled => "scheduled_date IS NOT NULL AND scheduled_date > $1",
            ArticleStatus::Archived => "archived_date IS NOT NULL AND archived_date < $1",
            ArticleStatus::Published => {
                "(scheduled_date IS NULL OR scheduled_date < $1) \
                 AND (archived_date IS NULL OR archived_date > $1)"
            }
        };

        let articles = sqlx::query_as::<_, Article>(&format!(
            r#"
            SELECT id, title, content, scheduled_date, archived_date
            FROM articles
            WHERE {condition}
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(now)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    async fn set_archived_date(
        &self,
        id: Uuid,
        archived_date: Option<OffsetDateTime>,
    ) -> Result<Option<Article>, anyhow::Error> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET archived_date = $2
            WHERE id = $1
            RETURNING id, title, content, scheduled_date, archived_date
            "#,
        )
        .bind(id)
        .bind(archived_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }
}
