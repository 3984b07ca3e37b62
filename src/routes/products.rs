use axum::{routing::get, Router};

use crate::handlers::product::{create_product, delete_product, get_product, list_products, update_product};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/products", get(list_products).post(create_product))
        .route("/admin/products/{id}", get(get_product).put(update_product).delete(delete_product))
}
