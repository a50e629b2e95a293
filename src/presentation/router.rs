use crate::infrastructure::state::AppState;
use crate::presentation::handlers::health::health_check;
use crate::presentation::openapi::ApiDoc;
use crate::presentation::routes;
use crate::shared::error::AppError;
use axum::{Router, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the HTTP application. CORS is layered on by the caller since it depends on config.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .nest("/auth", routes::auth::routes())
        .nest("/users", routes::users::routes())
        .nest("/articles", routes::articles::routes())
        .fallback(route_not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
