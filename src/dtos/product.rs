// src/dtos/product.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: String,
    pub subcategory_id: Option<i64>,
    pub external_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    /// Absent keeps the current subcategory; `null` detaches the product.
    #[serde(default, deserialize_with = "present")]
    pub subcategory_id: Option<Option<i64>>,
    pub external_id: Option<String>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Admin listing row with the "Category > Subcategory" label.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AdminProductRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub link: String,
    pub subcategory_id: Option<i64>,
    pub external_id: Option<String>,
    pub category_display_name: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(json: &str) -> UpdateProductRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn subcategory_distinguishes_missing_from_null() {
        assert_eq!(update(r#"{}"#).subcategory_id, None);
        assert_eq!(update(r#"{"subcategory_id":null}"#).subcategory_id, Some(None));
        assert_eq!(update(r#"{"subcategory_id":7}"#).subcategory_id, Some(Some(7)));
    }
}
