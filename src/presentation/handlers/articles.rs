use crate::application::articles::create::{CreateArticleRequest, CreateArticleUseCase};
use crate::application::articles::get::GetArticleUseCase;
use crate::application::articles::list::{ListArticlesRequest, ListArticlesUseCase};
use crate::application::articles::update::{UpdateArticleRequest, UpdateArticleUseCase};
use crate::domain::articles::Article;
use crate::infrastructure::state::AppState;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::query::Qs;
use crate::shared::response::ApiResponse;
use crate::shared::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

/// Create an article
#[utoipa::path(
    post,
    path = "/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ApiResponse<Article>),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "articles"
)]
pub async fn create_article(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = CreateArticleUseCase::new(state.articles.clone());

    let article = use_case.execute(req).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(article))))
}

/// List articles by status
#[utoipa::path(
    get,
    path = "/articles",
    params(ListArticlesRequest),
    responses(
        (status = 200, description = "Articles", body = ApiResponse<Vec<Article>>),
        (status = 422, description = "Invalid query", body = ErrorResponse)
    ),
    tag = "articles"
)]
pub async fn list_articles(
    State(state): State<AppState>,
    Qs(req): Qs<ListArticlesRequest>,
) -> Result<Json<ApiResponse<Vec<Article>>>, AppError> {
    let status = req.status;
    let use_case = ListArticlesUseCase::new(state.articles.clone());

    let (articles, page) = use_case.execute(req).await?;

    Ok(Json(ApiResponse::new(articles).with_meta(json!({
        "status": status,
        "limit": page.limit,
        "offset": page.offset,
    }))))
}

/// Get an article by id
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = ApiResponse<Article>),
        (status = 404, description = "Article not found", body = ErrorResponse)
    ),
    tag = "articles"
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Article>>, AppError> {
    let use_case = GetArticleUseCase::new(state.articles.clone());

    Ok(Json(ApiResponse::new(use_case.execute(id).await?)))
}

/// Archive or restore an article
#[utoipa::path(
    patch,
    path = "/articles/{id}",
    params(("id" = Uuid, Path, description = "Article id")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = ApiResponse<Article>),
        (status = 404, description = "Article not found", body = ErrorResponse)
    ),
    tag = "articles"
)]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateArticleRequest>,
) -> Result<Json<ApiResponse<Article>>, AppError> {
    let use_case = UpdateArticleUseCase::new(state.articles.clone());

    Ok(Json(ApiResponse::new(use_case.execute(id, req).await?)))
}
