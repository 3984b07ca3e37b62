use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const CONTACT_MESSAGE_COLUMNS: &str = "id, name, email, subject, message, timestamp, is_read, is_archived, \
     response_text, response_timestamp, likes, dislikes";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub is_archived: bool,
    pub response_text: Option<String>,
    pub response_timestamp: Option<DateTime<Utc>>,
    pub likes: i32,
    pub dislikes: i32,
}
