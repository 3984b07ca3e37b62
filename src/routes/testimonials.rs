use axum::{routing::{get, post, put}, Router};

use crate::handlers::testimonial::{
    create_testimonial, delete_testimonial, list_testimonials, toggle_visibility, update_testimonial,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/testimonials", get(list_testimonials).post(create_testimonial))
        .route("/admin/testimonials/{id}", put(update_testimonial).delete(delete_testimonial))
        .route("/admin/testimonials/{id}/toggle-visibility", post(toggle_visibility))
}
