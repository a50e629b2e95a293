use crate::infrastructure::redis;
use crate::infrastructure::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Health check endpoint with database and cache connectivity tests
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "All backends reachable"),
        (status = 503, description = "A backend is unreachable")
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match sqlx::query("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            "disconnected"
        }
    };

    let cache = match &state.redis {
        None => "not configured",
        Some(pool) => match redis::ping(pool).await {
            Ok(()) => "connected",
            Err(e) => {
                tracing::error!("Redis health check failed: {:?}", e);
                "disconnected"
            }
        },
    };

    let healthy = database == "connected" && cache != "disconnected";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if healthy { "healthy" } else { "unhealthy" },
            "database": database,
            "cache": cache,
        })),
    )
}
