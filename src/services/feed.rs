// src/services/feed.rs
//! Client for vendor product feeds: a JSON array of product records served over HTTP.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::models::product::fits_price_column;
use crate::utils::parse_price;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request to the external API timed out after {0:?}")]
    Timeout(Duration),

    #[error("Could not connect to the API URL {url}")]
    Connection { url: String },

    #[error("Error fetching data from API: {0}")]
    Request(String),

    #[error("Error parsing API response as JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Database error during sync: {0}")]
    Database(#[from] sqlx::Error),
}

impl SyncError {
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Timeout(_) => "timeout",
            SyncError::Connection { .. } => "connection",
            SyncError::Request(_) => "request",
            SyncError::Parse(_) => "parse",
            SyncError::Database(_) => "database",
        }
    }
}

/// Feeds disagree on whether prices are strings (`"$1,180"`) or bare numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeedPrice {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedRecord {
    pub external_id: String,
    pub name: String,
    #[serde(default)]
    pub external_price: Option<FeedPrice>,
    #[serde(default)]
    pub external_description: Option<String>,
    #[serde(default)]
    pub external_image: Option<String>,
    pub external_link: String,
}

impl FeedRecord {
    /// Normalized price. Anything unparsable or too large for the price column is zero so one
    /// bad record cannot abort a sync.
    pub fn price(&self) -> Decimal {
        let parsed = match &self.external_price {
            Some(FeedPrice::Text(raw)) => parse_price(raw),
            Some(FeedPrice::Number(n)) => parse_price(&n.to_string()),
            None => None,
        };

        match parsed {
            Some(price) if fits_price_column(price) => price,
            Some(price) => {
                warn!(external_id = %self.external_id, %price, "Price out of range, using 0");
                Decimal::ZERO
            }
            None => {
                warn!(
                    external_id = %self.external_id,
                    price = ?self.external_price,
                    "Could not convert price, using 0"
                );
                Decimal::ZERO
            }
        }
    }
}

#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, timeout })
    }

    /// Downloads and decodes the feed. Never touches the database.
    pub async fn fetch(&self, url: &str) -> Result<Vec<FeedRecord>, SyncError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e, url))?
            .error_for_status()
            .map_err(|e| SyncError::Request(e.to_string()))?;

        let body = response.bytes().await.map_err(|e| self.classify(e, url))?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn classify(&self, err: reqwest::Error, url: &str) -> SyncError {
        if err.is_timeout() {
            SyncError::Timeout(self.timeout)
        } else if err.is_connect() {
            SyncError::Connection { url: url.to_string() }
        } else {
            SyncError::Request(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client() -> FeedClient {
        FeedClient::new(Duration::from_millis(300)).unwrap()
    }

    #[tokio::test]
    async fn fetch_decodes_feed() {
        let base = serve(Router::new().route(
            "/feed",
            get(|| async {
                r#"[{"external_id":"EXT001","name":"Widget","external_price":"$10.50",
                     "external_description":"d","external_image":"/i.jpg","external_link":"https://x/w"},
                    {"external_id":"EXT002","name":"Gadget","external_price":79,
                     "external_link":"https://x/g"}]"#
            }),
        ))
        .await;

        let records = client().fetch(&format!("{base}/feed")).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].external_id, "EXT001");
        assert_eq!(records[0].price(), Decimal::new(1050, 2));
        assert_eq!(records[1].external_description, None);
        assert_eq!(records[1].price(), Decimal::from(79));
    }

    #[tokio::test]
    async fn non_success_status_is_request_error() {
        let base = serve(Router::new().route(
            "/feed",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        ))
        .await;

        let err = client().fetch(&format!("{base}/feed")).await.unwrap_err();
        assert_eq!(err.kind(), "request");
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let base = serve(Router::new().route("/feed", get(|| async { "{\"not\": \"a list\"}" }))).await;

        let err = client().fetch(&format!("{base}/feed")).await.unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[tokio::test]
    async fn slow_feed_times_out() {
        let base = serve(Router::new().route(
            "/feed",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "[]"
            }),
        ))
        .await;

        let err = client().fetch(&format!("{base}/feed")).await.unwrap_err();
        assert_eq!(err.kind(), "timeout");
    }

    #[tokio::test]
    async fn refused_connection_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client().fetch(&format!("http://{addr}/feed")).await.unwrap_err();
        assert_eq!(err.kind(), "connection");
    }

    #[test]
    fn exponent_number_price_is_parsed() {
        let record: FeedRecord = serde_json::from_str(
            r#"{"external_id":"X","name":"n","external_price":1e3,"external_link":"l"}"#,
        )
        .unwrap();
        assert_eq!(record.price(), Decimal::from(1000));
    }

    #[test]
    fn price_beyond_column_is_zero() {
        let record: FeedRecord = serde_json::from_str(
            r#"{"external_id":"X","name":"n","external_price":"$10,000,000,000","external_link":"l"}"#,
        )
        .unwrap();
        assert_eq!(record.price(), Decimal::ZERO);

        let record: FeedRecord = serde_json::from_str(
            r#"{"external_id":"X","name":"n","external_price":"$9,999,999,999.99","external_link":"l"}"#,
        )
        .unwrap();
        assert_eq!(record.price(), Decimal::new(999_999_999_999, 2));
    }

    #[test]
    fn missing_or_garbage_price_is_zero() {
        let record: FeedRecord = serde_json::from_str(
            r#"{"external_id":"X","name":"n","external_price":"ask","external_link":"l"}"#,
        )
        .unwrap();
        assert_eq!(record.price(), Decimal::ZERO);

        let record: FeedRecord =
            serde_json::from_str(r#"{"external_id":"X","name":"n","external_link":"l"}"#).unwrap();
        assert_eq!(record.price(), Decimal::ZERO);
    }
}
