use axum::{routing::{get, post}, Router};

use crate::handlers::sync::{sync_status, trigger_sync};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/api-products", get(sync_status))
        .route("/admin/api-products/sync", post(trigger_sync))
}
