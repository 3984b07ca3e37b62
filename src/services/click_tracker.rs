// src/services/click_tracker.rs
use chrono::{Local, NaiveDate};
use sqlx::PgPool;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ClickError {
    #[error("Affiliate {0} not found")]
    AffiliateNotFound(i64),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    pub destination: String,
    /// Today's click count after this click, `None` when the counter write failed.
    pub clicks_today: Option<i32>,
}

#[allow(async_fn_in_trait)]
pub trait ClickStore {
    async fn referral_link(&mut self, affiliate_id: i64) -> Result<Option<String>, sqlx::Error>;

    /// Adds one click to the `(affiliate_id, day)` counter, creating it if needed. Must be atomic.
    async fn increment_clicks(&mut self, affiliate_id: i64, day: NaiveDate) -> Result<i32, sqlx::Error>;
}

/// Server-local calendar day used to bucket clicks.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Counts a click against `affiliate_id` for `day` and returns where to send the visitor.
///
/// A failed counter write is logged and the redirect still goes out; analytics never block the
/// visitor once the destination is known.
pub async fn register_click<S: ClickStore>(
    store: &mut S,
    affiliate_id: i64,
    day: NaiveDate,
) -> Result<ClickOutcome, ClickError> {
    let destination = store
        .referral_link(affiliate_id)
        .await?
        .ok_or(ClickError::AffiliateNotFound(affiliate_id))?;

    let clicks_today = match store.increment_clicks(affiliate_id, day).await {
        Ok(clicks) => Some(clicks),
        Err(e) => {
            error!(affiliate_id, %day, error = %e, "Failed to record affiliate click");
            None
        }
    };

    Ok(ClickOutcome { destination, clicks_today })
}

pub struct PgClickStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgClickStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl ClickStore for PgClickStore<'_> {
    async fn referral_link(&mut self, affiliate_id: i64) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT referral_link FROM affiliates WHERE id = $1")
            .bind(affiliate_id)
            .fetch_optional(self.pool)
            .await
    }

    async fn increment_clicks(&mut self, affiliate_id: i64, day: NaiveDate) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO affiliate_statistics (affiliate_id, date, clicks)
             VALUES ($1, $2, 1)
             ON CONFLICT (affiliate_id, date)
             DO UPDATE SET clicks = affiliate_statistics.clicks + 1
             RETURNING clicks",
        )
        .bind(affiliate_id)
        .bind(day)
        .fetch_one(self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryClicks {
        affiliates: HashMap<i64, String>,
        daily: HashMap<(i64, NaiveDate), i32>,
        fail_writes: bool,
    }

    impl ClickStore for MemoryClicks {
        async fn referral_link(&mut self, affiliate_id: i64) -> Result<Option<String>, sqlx::Error> {
            Ok(self.affiliates.get(&affiliate_id).cloned())
        }

        async fn increment_clicks(&mut self, affiliate_id: i64, day: NaiveDate) -> Result<i32, sqlx::Error> {
            if self.fail_writes {
                return Err(sqlx::Error::PoolTimedOut);
            }
            let clicks = self.daily.entry((affiliate_id, day)).or_insert(0);
            *clicks += 1;
            Ok(*clicks)
        }
    }

    fn store_with_affiliate(id: i64) -> MemoryClicks {
        let mut store = MemoryClicks::default();
        store.affiliates.insert(id, format!("https://partner.example/{id}"));
        store
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[tokio::test]
    async fn same_day_clicks_share_one_row() {
        let mut store = store_with_affiliate(7);

        let first = register_click(&mut store, 7, day(10)).await.unwrap();
        let second = register_click(&mut store, 7, day(10)).await.unwrap();

        assert_eq!(first.clicks_today, Some(1));
        assert_eq!(second.clicks_today, Some(2));
        assert_eq!(second.destination, "https://partner.example/7");
        assert_eq!(store.daily.len(), 1);
        assert_eq!(store.daily[&(7, day(10))], 2);
    }

    #[tokio::test]
    async fn next_day_starts_a_new_row() {
        let mut store = store_with_affiliate(7);
        register_click(&mut store, 7, day(10)).await.unwrap();
        register_click(&mut store, 7, day(10)).await.unwrap();

        let next = register_click(&mut store, 7, day(11)).await.unwrap();

        assert_eq!(next.clicks_today, Some(1));
        assert_eq!(store.daily.len(), 2);
        assert_eq!(store.daily[&(7, day(10))], 2);
    }

    #[tokio::test]
    async fn n_clicks_count_to_n() {
        let mut store = store_with_affiliate(3);
        for _ in 0..25 {
            register_click(&mut store, 3, day(1)).await.unwrap();
        }
        assert_eq!(store.daily[&(3, day(1))], 25);
    }

    #[tokio::test]
    async fn unknown_affiliate_is_not_found_and_records_nothing() {
        let mut store = store_with_affiliate(7);

        let err = register_click(&mut store, 99, day(10)).await.unwrap_err();

        assert!(matches!(err, ClickError::AffiliateNotFound(99)));
        assert!(store.daily.is_empty());
    }

    #[tokio::test]
    async fn failed_write_still_redirects() {
        let mut store = store_with_affiliate(7);
        store.fail_writes = true;

        let outcome = register_click(&mut store, 7, day(10)).await.unwrap();

        assert_eq!(outcome.destination, "https://partner.example/7");
        assert_eq!(outcome.clicks_today, None);
    }
}
