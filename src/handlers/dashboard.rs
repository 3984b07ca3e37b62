// src/handlers/dashboard.rs
use axum::{extract::State, Json};

use crate::dtos::dashboard::DashboardResponse;
use crate::error::AppError;
use crate::state::AppState;

// GET /admin/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, AppError> {
    let counts = sqlx::query_as::<_, DashboardResponse>(
        "SELECT
            (SELECT COUNT(*) FROM products) AS product_count,
            (SELECT COUNT(*) FROM categories) AS category_count,
            (SELECT COUNT(*) FROM articles) AS article_count,
            (SELECT COUNT(*) FROM contact_messages WHERE NOT is_read) AS unread_messages_count,
            (SELECT COUNT(*) FROM testimonials WHERE NOT is_visible) AS pending_testimonials_count,
            (SELECT COUNT(*) FROM affiliates) AS affiliate_count,
            (SELECT COUNT(*) FROM affiliate_statistics) AS affiliate_statistic_count",
    )
    .fetch_one(&state.db_pool)
    .await?;
    Ok(Json(counts))
}
