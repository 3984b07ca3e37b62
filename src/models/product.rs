use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

pub const PRODUCT_COLUMNS: &str =
    "id, name, slug, price, description, image, link, subcategory_id, external_id, created_at, updated_at";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: String,
    pub subcategory_id: Option<i64>,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_SLUG_LEN: usize = 200;
pub const MAX_URL_LEN: usize = 255;
pub const MAX_EXTERNAL_ID_LEN: usize = 100;

/// `price` is `NUMERIC(12, 2)`: anything at or above 10^10 in magnitude overflows the column.
pub fn fits_price_column(price: Decimal) -> bool {
    price.abs() < Decimal::new(10_000_000_000, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_column_bounds() {
        assert!(fits_price_column(Decimal::new(999_999_999_999, 2)));
        assert!(!fits_price_column(Decimal::new(10_000_000_000, 0)));
        assert!(!fits_price_column(Decimal::new(-10_000_000_000, 0)));
    }
}
