use axum::{routing::get, Router};

use crate::handlers::api::{
    get_article, get_article_by_slug, get_category, get_product, get_subcategory, get_testimonial, list_articles,
    list_categories, list_products, list_subcategories, list_testimonials,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/categories", get(list_categories))
        .route("/api/categories/{id}", get(get_category))
        .route("/api/subcategories", get(list_subcategories))
        .route("/api/subcategories/{id}", get(get_subcategory))
        .route("/api/articles", get(list_articles))
        .route("/api/articles/{id}", get(get_article))
        .route("/api/articles/slug/{slug}", get(get_article_by_slug))
        .route("/api/testimonials", get(list_testimonials))
        .route("/api/testimonials/{id}", get(get_testimonial))
}
