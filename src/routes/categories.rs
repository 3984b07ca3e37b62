use axum::{routing::{get, post, put}, Router};

use crate::handlers::category::{
    create_category, create_subcategory, delete_category, delete_subcategory, get_category, list_categories,
    update_category, update_subcategory,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/categories", get(list_categories).post(create_category))
        .route("/admin/categories/{id}", get(get_category).put(update_category).delete(delete_category))
        .route("/admin/categories/{category_id}/subcategories", post(create_subcategory))
        .route(
            "/admin/categories/{category_id}/subcategories/{id}",
            put(update_subcategory).delete(delete_subcategory),
        )
}
