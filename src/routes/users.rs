use axum::{routing::{get, post}, Router};

use crate::handlers::user::{get_me, login_admin};
use crate::state::AppState;

pub fn open_routes() -> Router<AppState> {
    Router::new().route("/admin/login", post(login_admin))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/me", get(get_me))
}
