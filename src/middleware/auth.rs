use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::AUTHORIZATION;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
}

/// Lets the request through only with a valid bearer token of an admin user.
pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let auth_header = match req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok()) {
        Some(h) => h,
        None => return AppError::unauthorized("Missing Authorization header").into_response(),
    };

    // Expect "Bearer <token>"
    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return AppError::unauthorized("Invalid Authorization format").into_response(),
    };

    let claims = match verify_token(token, &state.config.jwt_secret) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    if !claims.is_admin {
        return AppError::forbidden("Access denied: administrator permissions required").into_response();
    }

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        username: claims.username,
    });

    next.run(req).await
}
