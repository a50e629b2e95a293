use crate::infrastructure::state::AppState;
use crate::presentation::handlers::users::{
    create_user, delete_user, get_user, list_users, update_user,
};
use axum::{Router, routing::get};

/// Phone-keyed user records. Login creates these too.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}
