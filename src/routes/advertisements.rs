use axum::{routing::get, Router};

use crate::handlers::advertisement::{
    create_advertisement, delete_advertisement, get_advertisement, list_advertisements, update_advertisement,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/advertisements", get(list_advertisements).post(create_advertisement))
        .route(
            "/admin/advertisements/{id}",
            get(get_advertisement).put(update_advertisement).delete(delete_advertisement),
        )
}
