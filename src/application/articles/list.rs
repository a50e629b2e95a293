use crate::domain::articles::{Article, ArticleRepository, ArticleStatus};
use crate::shared::pagination::Pagination;
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_ARTICLES_LIMIT: i64 = 10;

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListArticlesRequest {
    /// Which articles to return; `published` when omitted
    #[serde(default)]
    pub status: ArticleStatus,
    #[param(example = 10, minimum = 1, maximum = 100)]
    pub limit: Option<i64>,
    #[param(example = 0, minimum = 0)]
    pub offset: Option<i64>,
}

pub struct ListArticlesUseCase {
    repo: Arc<dyn ArticleRepository>,
}

impl ListArticlesUseCase {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        req: ListArticlesRequest,
    ) -> Result<(Vec<Article>, Pagination), anyhow::Error> {
        let page = Pagination::new(req.limit, req.offset, DEFAULT_ARTICLES_LIMIT);
        let articles = self
            .repo
            .find_by_status(req.status, OffsetDateTime::now_utc(), page.limit, page.offset)
            .await?;
        Ok((articles, page))
    }
}
