// src/handlers/advertisement.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::dtos::advertisement::AdvertisementRequest;
use crate::error::{map_constraint_violation, AppError};
use crate::models::advertisement::{Advertisement, ADVERTISEMENT_COLUMNS};
use crate::state::AppState;
use crate::validation::{blank_to_none, is_http_url};

fn check_links(req: &AdvertisementRequest) -> Result<(), AppError> {
    for (field, value) in [("Button URL", &req.button_url), ("Image URL", &req.image_url)] {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            if !is_http_url(v) && !v.starts_with('/') {
                return Err(AppError::validation(format!("{field} must be a valid URL")));
            }
        }
    }
    Ok(())
}

// GET /admin/advertisements
pub async fn list_advertisements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Advertisement>>, AppError> {
    let ads = sqlx::query_as::<_, Advertisement>(&format!(
        "SELECT {ADVERTISEMENT_COLUMNS} FROM advertisements ORDER BY id DESC"
    ))
    .fetch_all(&state.db_pool)
    .await?;
    Ok(Json(ads))
}

// GET /admin/advertisements/{id}
pub async fn get_advertisement(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Advertisement>, AppError> {
    let ad = sqlx::query_as::<_, Advertisement>(&format!(
        "SELECT {ADVERTISEMENT_COLUMNS} FROM advertisements WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Advertisement not found"))?;
    Ok(Json(ad))
}

// POST /admin/advertisements
pub async fn create_advertisement(
    State(state): State<AppState>,
    Json(req): Json<AdvertisementRequest>,
) -> Result<(StatusCode, Json<Advertisement>), AppError> {
    req.validate()?;
    check_links(&req)?;

    let ad = sqlx::query_as::<_, Advertisement>(&format!(
        "INSERT INTO advertisements (type, title, is_active, text_content, button_text, button_url,
                                     image_url, product_id, adsense_client_id, adsense_slot_id,
                                     start_date, end_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
         RETURNING {ADVERTISEMENT_COLUMNS}"
    ))
    .bind(&req.ad_type)
    .bind(req.title.trim())
    .bind(req.is_active.unwrap_or(true))
    .bind(blank_to_none(req.text_content))
    .bind(blank_to_none(req.button_text))
    .bind(blank_to_none(req.button_url))
    .bind(blank_to_none(req.image_url))
    .bind(req.product_id)
    .bind(blank_to_none(req.adsense_client_id))
    .bind(blank_to_none(req.adsense_slot_id))
    .bind(req.start_date)
    .bind(req.end_date)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, "Advertisement already exists"))?;

    info!(ad_id = ad.id, ad_type = %ad.ad_type, "Advertisement created");
    Ok((StatusCode::CREATED, Json(ad)))
}

// PUT /admin/advertisements/{id} - full replacement
pub async fn update_advertisement(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<AdvertisementRequest>,
) -> Result<Json<Advertisement>, AppError> {
    req.validate()?;
    check_links(&req)?;

    let ad = sqlx::query_as::<_, Advertisement>(&format!(
        "UPDATE advertisements
         SET type = $2, title = $3, is_active = $4, text_content = $5, button_text = $6,
             button_url = $7, image_url = $8, product_id = $9, adsense_client_id = $10,
             adsense_slot_id = $11, start_date = $12, end_date = $13
         WHERE id = $1
         RETURNING {ADVERTISEMENT_COLUMNS}"
    ))
    .bind(id)
    .bind(&req.ad_type)
    .bind(req.title.trim())
    .bind(req.is_active.unwrap_or(true))
    .bind(blank_to_none(req.text_content))
    .bind(blank_to_none(req.button_text))
    .bind(blank_to_none(req.button_url))
    .bind(blank_to_none(req.image_url))
    .bind(req.product_id)
    .bind(blank_to_none(req.adsense_client_id))
    .bind(blank_to_none(req.adsense_slot_id))
    .bind(req.start_date)
    .bind(req.end_date)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, "Advertisement already exists"))?
    .ok_or_else(|| AppError::not_found("Advertisement not found"))?;

    Ok(Json(ad))
}

// DELETE /admin/advertisements/{id}
pub async fn delete_advertisement(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM advertisements WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Advertisement not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Ads that are switched on and inside their date window right now.
pub(crate) async fn running_advertisements(state: &AppState) -> Result<Vec<Advertisement>, sqlx::Error> {
    let ads = sqlx::query_as::<_, Advertisement>(&format!(
        "SELECT {ADVERTISEMENT_COLUMNS} FROM advertisements
         WHERE is_active
           AND (start_date IS NULL OR start_date <= NOW())
           AND (end_date IS NULL OR end_date >= NOW())
         ORDER BY id DESC"
    ))
    .fetch_all(&state.db_pool)
    .await?;

    // Window re-checked against the app clock.
    let now = Utc::now();
    Ok(ads.into_iter().filter(|ad| ad.is_running(now)).collect())
}
