// src/handlers/referral.rs
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::services::click_tracker::{register_click, today, PgClickStore};
use crate::state::AppState;

// GET /ref/{affiliate_id}
#[instrument(skip(state))]
pub async fn track_referral(
    Path(affiliate_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let mut store = PgClickStore::new(&state.db_pool);
    let outcome = register_click(&mut store, affiliate_id, today()).await?;

    debug!(affiliate_id, clicks_today = ?outcome.clicks_today, "Referral click");
    Ok(Redirect::to(&outcome.destination))
}
