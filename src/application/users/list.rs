use crate::domain::users::{User, UserRepository};
use crate::shared::pagination::Pagination;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_USERS_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListUsersRequest {
    /// Number of users to skip
    #[param(example = 0, minimum = 0)]
    pub skip: Option<i64>,
    /// Maximum number of users to return
    #[param(example = 100, minimum = 1, maximum = 100)]
    pub limit: Option<i64>,
}

pub struct ListUsersUseCase {
    repo: Arc<dyn UserRepository>,
}

impl ListUsersUseCase {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        req: ListUsersRequest,
    ) -> Result<(Vec<User>, Pagination), anyhow::Error> {
        let page = Pagination::new(req.limit, req.skip, DEFAULT_USERS_LIMIT);
        let users = self.repo.find_all(page.limit, page.offset).await?;
        Ok((users, page))
    }
}
