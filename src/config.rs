// src/config.rs
use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub site_base_url: String,
    pub sync_timeout: Duration,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections: try_load("DB_MAX_CONNECTIONS", "10")?,
            host: try_load("HOST", "127.0.0.1")?,
            port: try_load("PORT", "3000")?,
            jwt_secret: required("JWT_SECRET")?,
            site_base_url: try_load::<String>("SITE_BASE_URL", "http://localhost:3000")?
                .trim_end_matches('/')
                .to_string(),
            sync_timeout: Duration::from_secs(try_load("SYNC_TIMEOUT_SECS", "10")?),
            admin_username: optional("ADMIN_USERNAME"),
            admin_password: optional("ADMIN_PASSWORD"),
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = optional(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_load_falls_back_to_default() {
        let port: u16 = try_load("AFILIADOS_TEST_UNSET_PORT", "4100").unwrap();
        assert_eq!(port, 4100);
    }

    #[test]
    fn try_load_rejects_garbage() {
        let err = try_load::<u16>("AFILIADOS_TEST_UNSET_BAD", "not-a-port").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "AFILIADOS_TEST_UNSET_BAD", .. }));
    }

    #[test]
    fn required_reports_missing_key() {
        let err = required("AFILIADOS_TEST_UNSET_REQUIRED").unwrap_err();
        assert_eq!(err.to_string(), "AFILIADOS_TEST_UNSET_REQUIRED must be set");
    }
}
