// src/handlers/affiliate.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::dtos::affiliate::{CreateAffiliateRequest, UpdateAffiliateRequest};
use crate::error::{map_constraint_violation, AppError};
use crate::models::affiliate::{Affiliate, AffiliateStatistic};
use crate::state::AppState;
use crate::validation::{looks_like_email, max_len, required, url};

const COLUMNS: &str = "id, name, email, referral_link, is_active";
const DUPLICATE_AFFILIATE: &str = "An affiliate with this email or referral link already exists";

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = required(name, "Name")?;
    max_len(&name, 100, "Name")?;
    Ok(name)
}

fn validate_email(email: &str) -> Result<String, AppError> {
    let email = required(email, "Email")?;
    if !looks_like_email(&email) {
        return Err(AppError::validation("Email is not valid"));
    }
    max_len(&email, 120, "Email")?;
    Ok(email.to_lowercase())
}

// GET /admin/affiliates
pub async fn list_affiliates(State(state): State<AppState>) -> Result<Json<Vec<Affiliate>>, AppError> {
    let affiliates = sqlx::query_as::<_, Affiliate>(&format!("SELECT {COLUMNS} FROM affiliates ORDER BY name, id"))
        .fetch_all(&state.db_pool)
        .await?;
    Ok(Json(affiliates))
}

// GET /admin/affiliates/{id}
pub async fn get_affiliate(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Affiliate>, AppError> {
    let affiliate = sqlx::query_as::<_, Affiliate>(&format!("SELECT {COLUMNS} FROM affiliates WHERE id = $1"))
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Affiliate not found"))?;
    Ok(Json(affiliate))
}

// POST /admin/affiliates
pub async fn create_affiliate(
    State(state): State<AppState>,
    Json(req): Json<CreateAffiliateRequest>,
) -> Result<(StatusCode, Json<Affiliate>), AppError> {
    let name = validate_name(&req.name)?;
    let email = validate_email(&req.email)?;
    let referral_link = url(&req.referral_link, "Referral link")?;

    let affiliate = sqlx::query_as::<_, Affiliate>(&format!(
        "INSERT INTO affiliates (name, email, referral_link, is_active) VALUES ($1, $2, $3, $4)
         RETURNING {COLUMNS}"
    ))
    .bind(&name)
    .bind(&email)
    .bind(&referral_link)
    .bind(req.is_active.unwrap_or(true))
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, DUPLICATE_AFFILIATE))?;

    info!(affiliate_id = affiliate.id, "Affiliate created");
    Ok((StatusCode::CREATED, Json(affiliate)))
}

// PUT /admin/affiliates/{id}
pub async fn update_affiliate(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<UpdateAffiliateRequest>,
) -> Result<Json<Affiliate>, AppError> {
    let current = sqlx::query_as::<_, Affiliate>(&format!("SELECT {COLUMNS} FROM affiliates WHERE id = $1"))
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Affiliate not found"))?;

    let name = match req.name {
        Some(raw) => validate_name(&raw)?,
        None => current.name,
    };
    let email = match req.email {
        Some(raw) => validate_email(&raw)?,
        None => current.email,
    };
    let referral_link = match req.referral_link {
        Some(raw) => url(&raw, "Referral link")?,
        None => current.referral_link,
    };

    let affiliate = sqlx::query_as::<_, Affiliate>(&format!(
        "UPDATE affiliates SET name = $2, email = $3, referral_link = $4, is_active = $5
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(&name)
    .bind(&email)
    .bind(&referral_link)
    .bind(req.is_active.unwrap_or(current.is_active))
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, DUPLICATE_AFFILIATE))?;

    Ok(Json(affiliate))
}

// DELETE /admin/affiliates/{id} - statistics cascade
pub async fn delete_affiliate(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM affiliates WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Affiliate not found"));
    }
    info!(affiliate_id = id, "Affiliate deleted");
    Ok(StatusCode::NO_CONTENT)
}

// GET /admin/affiliate-statistics
pub async fn list_statistics(
    State(state): State<AppState>,
) -> Result<Json<Vec<AffiliateStatistic>>, AppError> {
    let stats = sqlx::query_as::<_, AffiliateStatistic>(
        "SELECT s.id, s.affiliate_id, a.name AS affiliate_name, s.date, s.clicks,
                s.registrations, s.sales, s.commission_generated, s.is_paid
         FROM affiliate_statistics s
         JOIN affiliates a ON a.id = s.affiliate_id
         ORDER BY s.date DESC, a.name",
    )
    .fetch_all(&state.db_pool)
    .await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_normalised() {
        assert_eq!(validate_email(" Ana@Example.ES ").unwrap(), "ana@example.es");
        assert!(validate_email("no-at-sign").is_err());
    }
}
