// src/handlers/adsense.rs
use axum::{extract::State, Json};
use sqlx::PgPool;
use tracing::info;

use crate::dtos::adsense::UpdateAdsenseRequest;
use crate::error::AppError;
use crate::models::adsense_config::{AdsenseConfig, ADSENSE_COLUMNS};
use crate::state::AppState;
use crate::validation::{blank_to_none, max_len};

/// The single AdSense row, created empty and inactive on first access.
pub(crate) async fn current_config(pool: &PgPool) -> Result<AdsenseConfig, sqlx::Error> {
    let existing = sqlx::query_as::<_, AdsenseConfig>(&format!(
        "SELECT {ADSENSE_COLUMNS} FROM adsense_configs ORDER BY id LIMIT 1"
    ))
    .fetch_optional(pool)
    .await?;

    match existing {
        Some(config) => Ok(config),
        None => {
            sqlx::query_as::<_, AdsenseConfig>(&format!(
                "INSERT INTO adsense_configs (adsense_client_id, status) VALUES ('', 'inactive')
                 RETURNING {ADSENSE_COLUMNS}"
            ))
            .fetch_one(pool)
            .await
        }
    }
}

fn slot(value: Option<String>, field: &str) -> Result<Option<String>, AppError> {
    let value = blank_to_none(value);
    if let Some(v) = &value {
        max_len(v, 50, field)?;
    }
    Ok(value)
}

// GET /admin/adsense
pub async fn get_adsense(State(state): State<AppState>) -> Result<Json<AdsenseConfig>, AppError> {
    Ok(Json(current_config(&state.db_pool).await?))
}

// PUT /admin/adsense
pub async fn update_adsense(
    State(state): State<AppState>,
    Json(req): Json<UpdateAdsenseRequest>,
) -> Result<Json<AdsenseConfig>, AppError> {
    let client_id = req.adsense_client_id.trim().to_string();
    if req.is_active && client_id.is_empty() {
        return Err(AppError::validation("AdSense Client ID is required to activate AdSense"));
    }
    max_len(&client_id, 100, "AdSense Client ID")?;

    let current = current_config(&state.db_pool).await?;
    let status = if req.is_active { "active" } else { "inactive" };

    let config = sqlx::query_as::<_, AdsenseConfig>(&format!(
        "UPDATE adsense_configs
         SET adsense_client_id = $2, adsense_slot_header = $3, adsense_slot_sidebar = $4,
             adsense_slot_article_top = $5, adsense_slot_article_bottom = $6,
             status = $7, updated_at = NOW()
         WHERE id = $1
         RETURNING {ADSENSE_COLUMNS}"
    ))
    .bind(current.id)
    .bind(&client_id)
    .bind(slot(req.adsense_slot_header, "Header slot")?)
    .bind(slot(req.adsense_slot_sidebar, "Sidebar slot")?)
    .bind(slot(req.adsense_slot_article_top, "Article top slot")?)
    .bind(slot(req.adsense_slot_article_bottom, "Article bottom slot")?)
    .bind(status)
    .fetch_one(&state.db_pool)
    .await?;

    info!(%status, "AdSense configuration updated");
    Ok(Json(config))
}
