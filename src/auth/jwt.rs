// src/auth/jwt.rs
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

pub const TOKEN_TTL_HOURS: i64 = 8;

/// Back-office session claims. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub is_admin: bool,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    fn issue(user_id: i64, username: &str, is_admin: bool) -> Self {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::hours(TOKEN_TTL_HOURS);
        Self {
            sub: user_id,
            username: username.to_owned(),
            is_admin,
            iat: issued_at.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        }
    }
}

pub fn sign_token(user_id: i64, username: &str, is_admin: bool, secret: &str) -> Result<String, AppError> {
    let claims = Claims::issue(user_id, username, is_admin);
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::internal(format!("Token signing failed: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp"]);

    match decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            Err(AppError::unauthorized("Invalid or expired token"))
        }
    }
}
