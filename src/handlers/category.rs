// src/handlers/category.rs
use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::dtos::category::{CategoryRequest, CategoryWithSubcategories, UpdateSubcategoryRequest};
use crate::error::{map_constraint_violation, AppError};
use crate::models::category::{Category, Subcategory};
use crate::state::AppState;
use crate::utils::slugify;
use crate::validation::{max_len, required};

fn name_and_slug(raw: &str, label: &str) -> Result<(String, String), AppError> {
    let name = required(raw, label)?;
    max_len(&name, 100, label)?;
    if name.chars().count() < 2 {
        return Err(AppError::validation(format!("{label} must be at least 2 characters")));
    }
    let slug = slugify(&name);
    if slug.is_empty() {
        return Err(AppError::validation(format!("{label} must contain letters or digits")));
    }
    Ok((name, slug))
}

/// Groups subcategories under their categories, keeping category order.
pub(crate) fn group_subcategories(
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
) -> Vec<CategoryWithSubcategories> {
    let mut by_category: HashMap<i64, Vec<Subcategory>> = HashMap::new();
    for sub in subcategories {
        by_category.entry(sub.category_id).or_default().push(sub);
    }

    categories
        .into_iter()
        .map(|c| CategoryWithSubcategories {
            subcategories: by_category.remove(&c.id).unwrap_or_default(),
            id: c.id,
            name: c.name,
            slug: c.slug,
        })
        .collect()
}

pub(crate) async fn categories_with_subcategories(
    state: &AppState,
) -> Result<Vec<CategoryWithSubcategories>, AppError> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories ORDER BY name")
        .fetch_all(&state.db_pool)
        .await?;
    let subcategories = sqlx::query_as::<_, Subcategory>(
        "SELECT id, name, slug, category_id FROM subcategories ORDER BY name",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(group_subcategories(categories, subcategories))
}

// GET /admin/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryWithSubcategories>>, AppError> {
    Ok(Json(categories_with_subcategories(&state).await?))
}

// GET /admin/categories/{id}
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
        "SELECT id, name, slug, category_id FROM subcategories WHERE category_id = $1 ORDER BY name",
    )
    .bind(id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(CategoryWithSubcategories {
        id: category.id,
        name: category.name,
        slug: category.slug,
        subcategories,
    }))
}

// POST /admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let (name, slug) = name_and_slug(&payload.name, "Category name")?;

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
    )
    .bind(&name)
    .bind(&slug)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, "A category with this name (or a similar slug) already exists"))?;

    info!(category_id = category.id, %slug, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

// PUT /admin/categories/{id}
pub async fn update_category(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let (name, slug) = name_and_slug(&payload.name, "Category name")?;

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $2, slug = $3 WHERE id = $1 RETURNING id, name, slug",
    )
    .bind(id)
    .bind(&name)
    .bind(&slug)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, "A category with this name already exists"))?
    .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(Json(category))
}

// DELETE /admin/categories/{id} - cascades to subcategories and their products
pub async fn delete_category(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }

    info!(category_id = id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// POST /admin/categories/{category_id}/subcategories
pub async fn create_subcategory(
    Path(category_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Subcategory>), AppError> {
    let (name, slug) = name_and_slug(&payload.name, "Subcategory name")?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(category_id)
        .fetch_one(&state.db_pool)
        .await?;
    if !exists {
        return Err(AppError::not_found("Category not found"));
    }

    let subcategory = sqlx::query_as::<_, Subcategory>(
        "INSERT INTO subcategories (name, slug, category_id) VALUES ($1, $2, $3)
         RETURNING id, name, slug, category_id",
    )
    .bind(&name)
    .bind(&slug)
    .bind(category_id)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| {
        map_constraint_violation(e, &format!("A subcategory named \"{name}\" already exists"))
    })?;

    Ok((StatusCode::CREATED, Json(subcategory)))
}

// PUT /admin/categories/{category_id}/subcategories/{id}
pub async fn update_subcategory(
    Path((category_id, id)): Path<(i64, i64)>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateSubcategoryRequest>,
) -> Result<Json<Subcategory>, AppError> {
    let current = sqlx::query_as::<_, Subcategory>(
        "SELECT id, name, slug, category_id FROM subcategories WHERE id = $1 AND category_id = $2",
    )
    .bind(id)
    .bind(category_id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Subcategory not found"))?;

    let (name, slug) = match payload.name {
        Some(raw) => name_and_slug(&raw, "Subcategory name")?,
        None => (current.name, current.slug),
    };

    let subcategory = sqlx::query_as::<_, Subcategory>(
        "UPDATE subcategories SET name = $2, slug = $3, category_id = $4 WHERE id = $1
         RETURNING id, name, slug, category_id",
    )
    .bind(id)
    .bind(&name)
    .bind(&slug)
    .bind(payload.category_id.unwrap_or(current.category_id))
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, "A subcategory with this name already exists"))?;

    Ok(Json(subcategory))
}

// DELETE /admin/categories/{category_id}/subcategories/{id} - cascades to its products
pub async fn delete_subcategory(
    Path((category_id, id)): Path<(i64, i64)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM subcategories WHERE id = $1 AND category_id = $2")
        .bind(id)
        .bind(category_id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Subcategory not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
