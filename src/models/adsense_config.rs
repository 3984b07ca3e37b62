use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const ADSENSE_COLUMNS: &str = "id, adsense_client_id, adsense_slot_header, adsense_slot_sidebar, \
     adsense_slot_article_top, adsense_slot_article_bottom, status, created_at, updated_at";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdsenseConfig {
    pub id: i64,
    pub adsense_client_id: String,
    pub adsense_slot_header: Option<String>,
    pub adsense_slot_sidebar: Option<String>,
    pub adsense_slot_article_top: Option<String>,
    pub adsense_slot_article_bottom: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
