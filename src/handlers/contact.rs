// src/handlers/contact.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::dtos::contact::RespondMessageRequest;
use crate::error::AppError;
use crate::models::contact_message::{ContactMessage, CONTACT_MESSAGE_COLUMNS};
use crate::state::AppState;
use crate::validation::required;

const NOT_FOUND: &str = "Message not found";

// GET /admin/messages
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>, AppError> {
    let messages = sqlx::query_as::<_, ContactMessage>(&format!(
        "SELECT {CONTACT_MESSAGE_COLUMNS} FROM contact_messages ORDER BY timestamp DESC, id DESC"
    ))
    .fetch_all(&state.db_pool)
    .await?;
    Ok(Json(messages))
}

// GET /admin/messages/{id} - viewing a message marks it as read
pub async fn view_message(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ContactMessage>, AppError> {
    let message = sqlx::query_as::<_, ContactMessage>(&format!(
        "UPDATE contact_messages SET is_read = TRUE WHERE id = $1 RETURNING {CONTACT_MESSAGE_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    Ok(Json(message))
}

// POST /admin/messages/{id}/toggle-archive
pub async fn toggle_archive(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ContactMessage>, AppError> {
    let message = sqlx::query_as::<_, ContactMessage>(&format!(
        "UPDATE contact_messages SET is_archived = NOT is_archived WHERE id = $1
         RETURNING {CONTACT_MESSAGE_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    Ok(Json(message))
}

// POST /admin/messages/{id}/respond
pub async fn respond_message(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<RespondMessageRequest>,
) -> Result<Json<ContactMessage>, AppError> {
    let response_text = required(&req.response_text, "Response")?;

    let message = sqlx::query_as::<_, ContactMessage>(&format!(
        "UPDATE contact_messages
         SET response_text = $2, response_timestamp = NOW(), is_read = TRUE
         WHERE id = $1
         RETURNING {CONTACT_MESSAGE_COLUMNS}"
    ))
    .bind(id)
    .bind(&response_text)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    info!(message_id = id, "Contact message answered");
    Ok(Json(message))
}

// DELETE /admin/messages/{id}
pub async fn delete_message(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(NOT_FOUND));
    }
    Ok(StatusCode::NO_CONTENT)
}
