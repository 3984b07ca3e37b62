// src/state.rs
use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::services::feed::FeedClient;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub feed_client: FeedClient,
    /// Held for the duration of a catalog sync run.
    pub sync_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: Config) -> Result<Self, reqwest::Error> {
        let feed_client = FeedClient::new(config.sync_timeout)?;
        Ok(Self {
            db_pool,
            config: Arc::new(config),
            feed_client,
            sync_lock: Arc::new(Mutex::new(())),
        })
    }
}
