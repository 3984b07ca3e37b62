use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SyncInfo {
    pub id: i64,
    pub last_sync_time: DateTime<Utc>,
    pub last_sync_count: i32,
    pub last_synced_api_url: Option<String>,
}

/// The single "last sync" row, created with a zero count on first access.
pub async fn current(pool: &PgPool) -> Result<SyncInfo, sqlx::Error> {
    let existing = sqlx::query_as::<_, SyncInfo>(
        "SELECT id, last_sync_time, last_sync_count, last_synced_api_url
         FROM sync_info ORDER BY id LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    match existing {
        Some(info) => Ok(info),
        None => {
            sqlx::query_as::<_, SyncInfo>(
                "INSERT INTO sync_info (last_sync_time, last_sync_count, last_synced_api_url)
                 VALUES (NOW(), 0, 'N/A')
                 RETURNING id, last_sync_time, last_sync_count, last_synced_api_url",
            )
            .fetch_one(pool)
            .await
        }
    }
}

pub async fn record(pool: &PgPool, count: i32, api_url: &str) -> Result<SyncInfo, sqlx::Error> {
    let info = current(pool).await?;
    sqlx::query_as::<_, SyncInfo>(
        "UPDATE sync_info SET last_sync_time = NOW(), last_sync_count = $2, last_synced_api_url = $3
         WHERE id = $1
         RETURNING id, last_sync_time, last_sync_count, last_synced_api_url",
    )
    .bind(info.id)
    .bind(count)
    .bind(api_url)
    .fetch_one(pool)
    .await
}
