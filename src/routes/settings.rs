use axum::{routing::get, Router};

use crate::handlers::adsense::{get_adsense, update_adsense};
use crate::handlers::dashboard::get_dashboard;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(get_dashboard))
        .route("/admin/adsense", get(get_adsense).put(update_adsense))
}
