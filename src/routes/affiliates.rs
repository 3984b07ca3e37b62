use axum::{routing::get, Router};

use crate::handlers::affiliate::{
    create_affiliate, delete_affiliate, get_affiliate, list_affiliates, list_statistics, update_affiliate,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/affiliates", get(list_affiliates).post(create_affiliate))
        .route("/admin/affiliates/{id}", get(get_affiliate).put(update_affiliate).delete(delete_affiliate))
        .route("/admin/affiliate-statistics", get(list_statistics))
}
