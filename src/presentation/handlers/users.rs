use crate::application::users::create::{CreateUserRequest, CreateUserUseCase};
use crate::application::users::delete::DeleteUserUseCase;
use crate::application::users::get::GetUserUseCase;
use crate::application::users::list::{ListUsersRequest, ListUsersUseCase};
use crate::application::users::update::{UpdateUserRequest, UpdateUserUseCase};
use crate::domain::users::User;
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

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<User>),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = CreateUserUseCase::new(state.users.clone());

    let user = use_case.execute(req).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(user))))
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    params(ListUsersRequest),
    responses(
        (status = 200, description = "Users", body = ApiResponse<Vec<User>>),
        (status = 422, description = "Invalid query", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Qs(req): Qs<ListUsersRequest>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let use_case = ListUsersUseCase::new(state.users.clone());

    let (users, page) = use_case.execute(req).await?;

    Ok(Json(ApiResponse::new(users).with_meta(json!({
        "skip": page.offset,
        "limit": page.limit,
    }))))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = ApiResponse<User>),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let use_case = GetUserUseCase::new(state.users.clone());

    Ok(Json(ApiResponse::new(use_case.execute(id).await?)))
}

/// Replace a user
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let use_case = UpdateUserUseCase::new(state.users.clone());

    Ok(Json(ApiResponse::new(use_case.execute(id, req).await?)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let use_case = DeleteUserUseCase::new(state.users.clone());

    use_case.execute(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
