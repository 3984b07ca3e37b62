use axum::{routing::{get, put}, Router};

use crate::handlers::social_media::{create_link, delete_link, list_links, update_link};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/social-links", get(list_links).post(create_link))
        .route("/admin/social-links/{id}", put(update_link).delete(delete_link))
}
