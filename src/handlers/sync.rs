// src/handlers/sync.rs
use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::dtos::sync::{SyncRequest, SyncResponse};
use crate::error::AppError;
use crate::models::sync_info::{self, SyncInfo};
use crate::services::catalog_sync::sync_catalog;
use crate::state::AppState;
use crate::validation::url;

// GET /admin/api-products
pub async fn sync_status(State(state): State<AppState>) -> Result<Json<SyncInfo>, AppError> {
    Ok(Json(sync_info::current(&state.db_pool).await?))
}

// POST /admin/api-products/sync
pub async fn trigger_sync(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, AppError> {
    let api_url = url(&req.api_url, "API URL")?;

    let _guard = state.sync_lock.try_lock().map_err(|_| {
        warn!(%api_url, "Catalog sync requested while another run is in progress");
        AppError::conflict("A catalog sync is already running")
    })?;

    let report = sync_catalog(&state.feed_client, &state.db_pool, &api_url)
        .await
        .map_err(|e| {
            warn!(%api_url, kind = e.kind(), error = %e, "Catalog sync failed");
            AppError::from(e)
        })?;

    let processed = report.processed();
    let sync_info = sync_info::record(&state.db_pool, processed, &api_url).await?;

    info!(%api_url, processed, "Catalog sync recorded");
    Ok(Json(SyncResponse {
        message: format!(
            "Synchronization complete: {} updated, {} created, {} skipped",
            report.updated, report.created, report.skipped
        ),
        report,
        sync_info,
    }))
}
