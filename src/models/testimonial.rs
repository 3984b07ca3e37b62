use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const TESTIMONIAL_COLUMNS: &str = "id, author, content, date_posted, is_visible, likes, dislikes";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Testimonial {
    pub id: i64,
    pub author: String,
    pub content: String,
    pub date_posted: DateTime<Utc>,
    pub is_visible: bool,
    pub likes: i32,
    pub dislikes: i32,
}
