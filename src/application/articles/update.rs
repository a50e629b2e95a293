use crate::application::articles::get::ARTICLE_NOT_FOUND_MESSAGE;
use crate::domain::articles::{Article, ArticleRepository};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateArticleRequest {
    /// `true` archives the article now, `false` clears the archive date
    pub archive: bool,
}

pub struct UpdateArticleUseCase {
    repo: Arc<dyn ArticleRepository>,
}

impl UpdateArticleUseCase {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: Uuid, req: UpdateArticleRequest) -> Result<Article, AppError> {
        let archived_date = req.archive.then(OffsetDateTime::now_utc);

        self.repo
            .set_archived_date(id, archived_date)
            .await?
            .ok_or_else(|| AppError::NotFound(ARTICLE_NOT_FOUND_MESSAGE.to_string()))
    }
}
