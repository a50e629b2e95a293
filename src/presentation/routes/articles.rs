use crate::presentation::handlers::articles;
use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(articles::create_article).get(articles::list_articles))
        .route(
            "/{id}",
            get(articles::get_article).patch(articles::update_article),
        )
}
