use serde::{Deserialize, Serialize};

use crate::dtos::product::ProductSummary;
use crate::models::article::Article;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub products: Vec<ProductSummary>,
    pub articles: Vec<Article>,
    pub page: i64,
    pub total_pages: i64,
}
