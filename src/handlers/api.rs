// src/handlers/api.rs
//
// Read-only catalog and content API.
use axum::{
    extract::{Path, State},
    Json,
};

use crate::dtos::category::{CategoryWithSubcategories, SubcategoryWithProducts};
use crate::dtos::product::ProductSummary;
use crate::dtos::testimonial::PublicTestimonial;
use crate::error::AppError;
use crate::models::article::{Article, ARTICLE_COLUMNS};
use crate::models::category::{Category, Subcategory};
use crate::models::product::{Product, PRODUCT_COLUMNS};
use crate::models::testimonial::{Testimonial, TESTIMONIAL_COLUMNS};
use crate::state::AppState;

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    let products = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
        .fetch_all(&state.db_pool)
        .await?;
    Ok(Json(products))
}

pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Product>, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories ORDER BY id")
        .fetch_all(&state.db_pool)
        .await?;
    Ok(Json(categories))
}

pub async fn get_category(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<CategoryWithSubcategories>, AppError> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    let subcategories = sqlx::query_as::<_, Subcategory>(
        "SELECT id, name, slug, category_id FROM subcategories WHERE category_id = $1 ORDER BY id",
    )
    .bind(id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(CategoryWithSubcategories { id: category.id, name: category.name, slug: category.slug, subcategories }))
}

pub async fn list_subcategories(State(state): State<AppState>) -> Result<Json<Vec<Subcategory>>, AppError> {
    let subcategories =
        sqlx::query_as::<_, Subcategory>("SELECT id, name, slug, category_id FROM subcategories ORDER BY id")
            .fetch_all(&state.db_pool)
            .await?;
    Ok(Json(subcategories))
}

pub async fn get_subcategory(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<SubcategoryWithProducts>, AppError> {
    let sub = sqlx::query_as::<_, Subcategory>("SELECT id, name, slug, category_id FROM subcategories WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Subcategory not found"))?;
    let products = sqlx::query_as::<_, ProductSummary>(
        "SELECT id, name, slug, price, image, link FROM products WHERE subcategory_id = $1 ORDER BY id",
    )
    .bind(id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(SubcategoryWithProducts {
        id: sub.id,
        name: sub.name,
        slug: sub.slug,
        category_id: sub.category_id,
        products,
    }))
}

pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    let articles = sqlx::query_as::<_, Article>(&format!(
        "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY date_posted DESC, id DESC"
    ))
    .fetch_all(&state.db_pool)
    .await?;
    Ok(Json(articles))
}

pub async fn get_article(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Article>, AppError> {
    let article = sqlx::query_as::<_, Article>(&format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"))
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Article not found"))?;
    Ok(Json(article))
}

pub async fn get_article_by_slug(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Article>, AppError> {
    let article = sqlx::query_as::<_, Article>(&format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = $1"))
        .bind(&slug)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Article not found"))?;
    Ok(Json(article))
}

pub async fn list_testimonials(State(state): State<AppState>) -> Result<Json<Vec<PublicTestimonial>>, AppError> {
    let testimonials = sqlx::query_as::<_, Testimonial>(&format!(
        "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE is_visible ORDER BY date_posted DESC, id DESC"
    ))
    .fetch_all(&state.db_pool)
    .await?;
    Ok(Json(testimonials.into_iter().map(PublicTestimonial::from).collect()))
}

// Hidden testimonials are indistinguishable from missing ones.
pub async fn get_testimonial(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<PublicTestimonial>, AppError> {
    let testimonial = sqlx::query_as::<_, Testimonial>(&format!(
        "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE id = $1 AND is_visible"
    ))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Testimonial not found"))?;
    Ok(Json(testimonial.into()))
}
