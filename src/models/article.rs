use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const ARTICLE_COLUMNS: &str = "id, title, slug, content, author, date_posted, image";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author: String,
    pub date_posted: DateTime<Utc>,
    pub image: Option<String>,
}
