use axum::{routing::{get, post}, Router};

use crate::handlers::contact::{delete_message, list_messages, respond_message, toggle_archive, view_message};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/messages", get(list_messages))
        .route("/admin/messages/{id}", get(view_message).delete(delete_message))
        .route("/admin/messages/{id}/toggle-archive", post(toggle_archive))
        .route("/admin/messages/{id}/respond", post(respond_message))
}
