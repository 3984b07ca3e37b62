// src/handlers/testimonial.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;
use tracing::info;

use crate::dtos::testimonial::{CreateTestimonialRequest, UpdateTestimonialRequest};
use crate::error::AppError;
use crate::models::testimonial::{Testimonial, TESTIMONIAL_COLUMNS};
use crate::state::AppState;
use crate::validation::{max_len, required};

pub(crate) fn validate_author(author: &str) -> Result<String, AppError> {
    let author = required(author, "Author")?;
    max_len(&author, 100, "Author")?;
    Ok(author)
}

async fn fetch_testimonial(pool: &PgPool, id: i64) -> Result<Testimonial, AppError> {
    sqlx::query_as::<_, Testimonial>(&format!(
        "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("Testimonial not found"))
}

// GET /admin/testimonials
pub async fn list_testimonials(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>, AppError> {
    let testimonials = sqlx::query_as::<_, Testimonial>(&format!(
        "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials ORDER BY date_posted DESC, id DESC"
    ))
    .fetch_all(&state.db_pool)
    .await?;
    Ok(Json(testimonials))
}

// POST /admin/testimonials
pub async fn create_testimonial(
    State(state): State<AppState>,
    Json(req): Json<CreateTestimonialRequest>,
) -> Result<(StatusCode, Json<Testimonial>), AppError> {
    let author = validate_author(&req.author)?;
    let content = required(&req.content, "Content")?;

    let testimonial = sqlx::query_as::<_, Testimonial>(&format!(
        "INSERT INTO testimonials (author, content, is_visible) VALUES ($1, $2, $3)
         RETURNING {TESTIMONIAL_COLUMNS}"
    ))
    .bind(&author)
    .bind(&content)
    .bind(req.is_visible)
    .fetch_one(&state.db_pool)
    .await?;

    Ok((StatusCode::CREATED, Json(testimonial)))
}

// PUT /admin/testimonials/{id}
pub async fn update_testimonial(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<UpdateTestimonialRequest>,
) -> Result<Json<Testimonial>, AppError> {
    let current = fetch_testimonial(&state.db_pool, id).await?;

    let author = match req.author {
        Some(raw) => validate_author(&raw)?,
        None => current.author,
    };
    let content = match req.content {
        Some(raw) => required(&raw, "Content")?,
        None => current.content,
    };

    let testimonial = sqlx::query_as::<_, Testimonial>(&format!(
        "UPDATE testimonials SET author = $2, content = $3, is_visible = $4 WHERE id = $1
         RETURNING {TESTIMONIAL_COLUMNS}"
    ))
    .bind(id)
    .bind(&author)
    .bind(&content)
    .bind(req.is_visible.unwrap_or(current.is_visible))
    .fetch_one(&state.db_pool)
    .await?;

    Ok(Json(testimonial))
}

// POST /admin/testimonials/{id}/toggle-visibility
pub async fn toggle_visibility(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Testimonial>, AppError> {
    let testimonial = sqlx::query_as::<_, Testimonial>(&format!(
        "UPDATE testimonials SET is_visible = NOT is_visible WHERE id = $1
         RETURNING {TESTIMONIAL_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Testimonial not found"))?;

    info!(testimonial_id = id, is_visible = testimonial.is_visible, "Testimonial visibility toggled");
    Ok(Json(testimonial))
}

// DELETE /admin/testimonials/{id}
pub async fn delete_testimonial(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Testimonial not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
