use axum::{routing::get, Router};

use crate::handlers::article::{create_article, delete_article, get_article, list_articles, update_article};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/articles", get(list_articles).post(create_article))
        .route("/admin/articles/{id}", get(get_article).put(update_article).delete(delete_article))
}
