// src/error.rs
use std::collections::BTreeMap;

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

use crate::services::click_tracker::ClickError;
use crate::services::feed::SyncError;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(sqlx::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    ValidationError(String),
    FieldErrors(BTreeMap<&'static str, String>),
    Conflict(String),
    Upstream { kind: &'static str, message: String },
    Internal(String),
}

impl AppError {
    pub fn db(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn bad_gateway(kind: &'static str, msg: impl Into<String>) -> Self {
        AppError::Upstream { kind, message: msg.into() }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::FieldErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Maps Postgres constraint violations to client errors, everything else stays a database error.
pub fn map_constraint_violation(err: sqlx::Error, conflict_message: &str) -> AppError {
    if let Some(db) = err.as_database_error() {
        match db.code().as_deref() {
            Some("23505") => return AppError::conflict(conflict_message),
            Some("23503") => return AppError::validation("Referenced record does not exist"),
            _ => {}
        }
    }
    AppError::db(err)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::DatabaseError(e) => {
                tracing::error!(error = %e, "Database error");
                json!({ "error": "Database error occurred" })
            }
            AppError::Internal(msg) => {
                tracing::error!(%msg, "Internal error");
                json!({ "error": "Internal server error" })
            }
            AppError::FieldErrors(fields) => json!({
                "error": "Validation failed",
                "fields": fields,
            }),
            AppError::Upstream { kind, message } => json!({
                "error": message,
                "kind": kind,
            }),
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg)
            | AppError::Conflict(msg) => json!({ "error": msg }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Database(e) => AppError::db(e),
            other => AppError::bad_gateway(other.kind(), other.to_string()),
        }
    }
}

impl From<ClickError> for AppError {
    fn from(err: ClickError) -> Self {
        match err {
            ClickError::AffiliateNotFound(_) => AppError::not_found("Affiliate not found"),
            ClickError::Database(e) => AppError::db(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_variant() {
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::db(sqlx::Error::RowNotFound).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::Upstream { kind: "timeout", message: "slow".into() }.status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn non_constraint_errors_pass_through() {
        let err = map_constraint_violation(sqlx::Error::RowNotFound, "dup");
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        let err: AppError = SyncError::Request("HTTP 503".into()).into();
        assert!(matches!(err, AppError::Upstream { kind: "request", .. }));
        let err: AppError = SyncError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err: AppError = ClickError::AffiliateNotFound(4).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn database_details_are_not_leaked() {
        let resp = AppError::db(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Database error occurred");
    }
}
