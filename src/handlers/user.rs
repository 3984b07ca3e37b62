use axum::{extract::{Extension, State}, Json};
use bcrypt::verify;
use tracing::{info, instrument, warn};

use crate::auth::jwt::{sign_token, TOKEN_TTL_HOURS};
use crate::dtos::user::{LoginRequest, LoginResponse, MeResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::user::User;
use crate::state::AppState;

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login_admin(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, is_admin, created_at FROM users WHERE username = $1",
    )
    .bind(payload.username.trim())
    .fetch_optional(&state.db_pool)
    .await?;

    // Same answer for unknown users, bad passwords and non-admins.
    let invalid = || AppError::unauthorized("Invalid username or password");

    let user = user.ok_or_else(invalid)?;
    let ok = verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;
    if !ok || !user.is_admin {
        warn!("Rejected admin login");
        return Err(invalid());
    }

    let token = sign_token(user.id, &user.username, user.is_admin, &state.config.jwt_secret)?;
    info!(user_id = user.id, "Admin logged in");

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in_seconds: (TOKEN_TTL_HOURS * 60 * 60) as usize,
    }))
}

pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<MeResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, is_admin, created_at FROM users WHERE id = $1",
    )
    .bind(auth.user_id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
        is_admin: user.is_admin,
    }))
}
