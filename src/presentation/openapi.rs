use crate::application::articles::create::CreateArticleRequest;
use crate::application::articles::list::ListArticlesRequest;
use crate::application::articles::update::UpdateArticleRequest;
use crate::application::auth::login::VerifyOtpRequest;
use crate::application::auth::refresh::RefreshTokenRequest;
use crate::application::auth::request_otp::RequestOtpRequest;
use crate::application::auth::tokens::TokenPair;
use crate::application::users::create::CreateUserRequest;
use crate::application::users::list::ListUsersRequest;
use crate::application::users::update::UpdateUserRequest;
use crate::domain::articles::{Article, ArticleStatus};
use crate::domain::users::User;
use crate::shared::error::{ErrorDetail, ErrorResponse};
use crate::shared::pagination::Pagination;
use crate::shared::response::ApiResponse;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Phoneauth API",
        version = "0.1.0",
        description = "Phone number one-time code login with rotating JWT refresh tokens"
    ),
    paths(
        crate::presentation::handlers::health::health_check,
        crate::presentation::handlers::auth::request_otp,
        crate::presentation::handlers::auth::verify_otp,
        crate::presentation::handlers::auth::verify_token,
        crate::presentation::handlers::auth::refresh_token,
        crate::presentation::handlers::users::create_user,
        crate::presentation::handlers::users::list_users,
        crate::presentation::handlers::users::get_user,
        crate::presentation::handlers::users::update_user,
        crate::presentation::handlers::users::delete_user,
        crate::presentation::handlers::articles::create_article,
        crate::presentation::handlers::articles::list_articles,
        crate::presentation::handlers::articles::get_article,
        crate::presentation::handlers::articles::update_article,
    ),
    components(
        schemas(
            RequestOtpRequest,
            VerifyOtpRequest,
            RefreshTokenRequest,
            TokenPair,
            CreateUserRequest,
            UpdateUserRequest,
            ListUsersRequest,
            CreateArticleRequest,
            UpdateArticleRequest,
            ListArticlesRequest,
            User,
            Article,
            ArticleStatus,
            Pagination,
            ApiResponse<User>,
            ApiResponse<Vec<User>>,
            ApiResponse<Article>,
            ApiResponse<Vec<Article>>,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    tags(
        (name = "auth", description = "One-time codes and tokens"),
        (name = "users", description = "User management endpoints"),
        (name = "articles", description = "Article endpoints"),
        (name = "health", description = "Service health")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
