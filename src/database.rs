// src/database.rs
use std::time::Duration;

use bcrypt::{hash, DEFAULT_COST};
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Creates the configured admin account on first boot. Existing accounts are left untouched.
pub async fn ensure_admin_user(pool: &PgPool, config: &Config) -> Result<(), AppError> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set, skipping admin bootstrap");
        return Ok(());
    };

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await?;

    if exists {
        info!(%username, "Admin user already exists");
        return Ok(());
    }

    let password_hash = hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    sqlx::query("INSERT INTO users (username, password_hash, is_admin) VALUES ($1, $2, TRUE)")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await?;

    info!(%username, "Admin user created");
    Ok(())
}
