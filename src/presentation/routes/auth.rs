use crate::presentation::handlers::auth;
use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::state::AppState;

/// Auth routes - one-time codes and token lifecycle
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/request-otp", post(auth::request_otp))
        .route("/token", post(auth::verify_otp))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/token/verify", get(auth::verify_token))
        .route("/token/refresh", post(auth::refresh_token))
}
