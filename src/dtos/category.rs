use serde::{Deserialize, Serialize};

use crate::dtos::page::Page;
use crate::dtos::product::ProductSummary;
use crate::models::category::Subcategory;

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateSubcategoryRequest {
    pub name: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Serialize)]
pub struct CategoryWithSubcategories {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub subcategories: Vec<Subcategory>,
}

#[derive(Serialize, sqlx::FromRow)]
pub struct SubcategoryWithCount {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub category_id: i64,
    pub product_count: i64,
}

#[derive(Serialize)]
pub struct CategoryOverview {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub subcategories: Vec<SubcategoryWithCount>,
}

#[derive(Serialize)]
pub struct SubcategoryWithProducts {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub category_id: i64,
    pub products: Vec<ProductSummary>,
}

#[derive(Serialize)]
pub struct SubcategoryPage {
    pub subcategory: Subcategory,
    pub products: Page<ProductSummary>,
}
