use crate::domain::articles::{Article, ArticleRepository, NewArticle};
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    #[schema(example = "Launch notes")]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// Publication is held back until this instant
    #[serde(default, with = "time::serde::iso8601::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub scheduled_date: Option<OffsetDateTime>,
    /// The article counts as archived after this instant
    #[serde(default, with = "time::serde::iso8601::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub archived_date: Option<OffsetDateTime>,
}

pub struct CreateArticleUseCase {
    repo: Arc<dyn ArticleRepository>,
}

impl CreateArticleUseCase {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, req: CreateArticleRequest) -> Result<Article, anyhow::Error> {
        self.repo
            .create(NewArticle {
                title: req.title,
                content: req.content,
                scheduled_date: req.scheduled_date,
                archived_date: req.archived_date,
            })
            .await
    }
}
