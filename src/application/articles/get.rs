use crate::domain::articles::{Article, ArticleRepository};
use crate::shared::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub const ARTICLE_NOT_FOUND_MESSAGE: &str = "Article not found";

pub struct GetArticleUseCase {
    repo: Arc<dyn ArticleRepository>,
}

impl GetArticleUseCase {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: Uuid) -> Result<Article, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ARTICLE_NOT_FOUND_MESSAGE.to_string()))
    }
}
