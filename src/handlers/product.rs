// src/handlers/product.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use tracing::{info, instrument};

use crate::dtos::page::{Page, PageQuery};
use crate::dtos::product::{AdminProductRow, CreateProductRequest, UpdateProductRequest};
use crate::error::{map_constraint_violation, AppError};
use crate::models::product::{
    fits_price_column, Product, MAX_EXTERNAL_ID_LEN, MAX_NAME_LEN, MAX_URL_LEN, PRODUCT_COLUMNS,
};
use crate::services::catalog_sync::{available_slug, CatalogStore, PgCatalogStore, ProductFields};
use crate::state::AppState;
use crate::validation::{blank_to_none, image, max_len, required, url};

const ADMIN_PER_PAGE: i64 = 20;
const DUPLICATE_PRODUCT: &str = "A product with this name or external ID already exists";

pub(crate) async fn fetch_product(conn: &mut PgConnection, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

fn validate_price(price: Decimal) -> Result<Decimal, AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::validation("Price cannot be negative"));
    }
    let price = price.round_dp(2);
    if !fits_price_column(price) {
        return Err(AppError::validation("Price is too large"));
    }
    Ok(price)
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = required(name, "Product name")?;
    max_len(&name, MAX_NAME_LEN, "Product name")?;
    Ok(name)
}

fn validate_link(link: &str) -> Result<String, AppError> {
    let link = url(link, "Affiliate link")?;
    max_len(&link, MAX_URL_LEN, "Affiliate link")?;
    Ok(link)
}

fn validate_external_id(external_id: Option<String>) -> Result<Option<String>, AppError> {
    let external_id = blank_to_none(external_id);
    if let Some(ext) = &external_id {
        max_len(ext, MAX_EXTERNAL_ID_LEN, "External ID")?;
    }
    Ok(external_id)
}

// GET /admin/products
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<AdminProductRow>>, AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&state.db_pool)
        .await?;

    let rows = sqlx::query_as::<_, AdminProductRow>(
        "SELECT p.id, p.name, p.slug, p.price, p.image, p.link, p.subcategory_id, p.external_id,
                COALESCE(c.name || ' > ' || s.name, 'Uncategorized') AS category_display_name
         FROM products p
         LEFT JOIN subcategories s ON s.id = p.subcategory_id
         LEFT JOIN categories c ON c.id = s.category_id
         ORDER BY p.created_at DESC, p.id DESC
         LIMIT $1 OFFSET $2",
    )
    .bind(ADMIN_PER_PAGE)
    .bind(query.offset(ADMIN_PER_PAGE))
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(Page::new(rows, query.page(), ADMIN_PER_PAGE, total)))
}

// GET /admin/products/{id}
#[instrument(skip(state))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Product>, AppError> {
    let mut conn = state.db_pool.acquire().await?;
    let product = fetch_product(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

// POST /admin/products
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let name = validate_name(&payload.name)?;
    let link = validate_link(&payload.link)?;
    let price = validate_price(payload.price)?;
    let image = image(payload.image)?;
    let external_id = validate_external_id(payload.external_id)?;

    let mut store = PgCatalogStore::begin(&state.db_pool).await?;
    let slug = available_slug(&mut store, &name, None).await?;
    let fields = ProductFields {
        name,
        slug,
        price,
        description: blank_to_none(payload.description),
        image,
        link,
    };

    let id = store
        .insert_product(&fields, payload.subcategory_id, external_id.as_deref())
        .await
        .map_err(|e| map_constraint_violation(e, DUPLICATE_PRODUCT))?;
    let product = fetch_product(store.conn(), id)
        .await?
        .ok_or_else(|| AppError::internal("Inserted product vanished"))?;
    store.commit().await?;

    info!(product_id = product.id, slug = %product.slug, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /admin/products/{id}
#[instrument(skip(state, payload))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    let mut store = PgCatalogStore::begin(&state.db_pool).await?;
    let existing = fetch_product(store.conn(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let name = match payload.name {
        Some(name) => validate_name(&name)?,
        None => existing.name,
    };
    let link = match payload.link {
        Some(link) => validate_link(&link)?,
        None => existing.link,
    };
    let price = match payload.price {
        Some(price) => validate_price(price)?,
        None => existing.price,
    };
    let image = match payload.image {
        Some(path) => image(Some(path))?,
        None => existing.image,
    };
    let description = match payload.description {
        Some(text) => blank_to_none(Some(text)),
        None => existing.description,
    };
    let subcategory_id = match payload.subcategory_id {
        Some(subcategory_id) => subcategory_id,
        None => existing.subcategory_id,
    };
    let external_id = match payload.external_id {
        Some(ext) => validate_external_id(Some(ext))?,
        None => existing.external_id,
    };

    let slug = available_slug(&mut store, &name, Some(id)).await?;
    let fields = ProductFields { name, slug, price, description, image, link };
    store
        .update_product(id, &fields)
        .await
        .map_err(|e| map_constraint_violation(e, DUPLICATE_PRODUCT))?;

    sqlx::query("UPDATE products SET subcategory_id = $2, external_id = $3 WHERE id = $1")
        .bind(id)
        .bind(subcategory_id)
        .bind(&external_id)
        .execute(store.conn())
        .await
        .map_err(|e| map_constraint_violation(e, DUPLICATE_PRODUCT))?;

    let product = fetch_product(store.conn(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    store.commit().await?;

    Ok(Json(product))
}

// DELETE /admin/products/{id}
#[instrument(skip(state))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }

    info!(product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_must_fit_the_column() {
        assert!(validate_price(Decimal::new(-1, 2)).is_err());
        assert!(validate_price(Decimal::new(10_000_000_000, 0)).is_err());
        assert_eq!(validate_price(Decimal::new(12346, 3)).unwrap(), Decimal::new(1235, 2));
        assert_eq!(
            validate_price(Decimal::new(999_999_999_999, 2)).unwrap(),
            Decimal::new(999_999_999_999, 2)
        );
    }

    #[test]
    fn links_and_external_ids_are_bounded() {
        assert!(validate_link(&format!("https://x/{}", "l".repeat(MAX_URL_LEN))).is_err());
        assert_eq!(validate_link(" https://x/p ").unwrap(), "https://x/p");
        assert!(validate_external_id(Some("E".repeat(MAX_EXTERNAL_ID_LEN + 1))).is_err());
        assert_eq!(validate_external_id(Some("  ".into())).unwrap(), None);
    }
}
