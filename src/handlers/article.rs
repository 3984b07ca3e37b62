// src/handlers/article.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;
use tracing::info;

use crate::dtos::article::{CreateArticleRequest, UpdateArticleRequest};
use crate::error::{map_constraint_violation, AppError};
use crate::models::article::{Article, ARTICLE_COLUMNS};
use crate::state::AppState;
use crate::utils::{numbered_slug, slugify_or};
use crate::validation::{image, max_len, required};

const DEFAULT_AUTHOR: &str = "Admin";
const MAX_SLUG_LEN: usize = 200;

/// Slug derived from the title, suffixed `-2`, `-3`, ... when another article owns it.
async fn article_slug(pool: &PgPool, title: &str, owner: Option<i64>) -> Result<String, sqlx::Error> {
    let base = slugify_or(title, "article");
    let mut n = 1;
    loop {
        let candidate = numbered_slug(&base, n, MAX_SLUG_LEN);
        let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM articles WHERE slug = $1")
            .bind(&candidate)
            .fetch_optional(pool)
            .await?;
        match taken {
            Some(id) if Some(id) != owner => n += 1,
            _ => return Ok(candidate),
        }
    }
}

async fn fetch_article(pool: &PgPool, id: i64) -> Result<Article, AppError> {
    sqlx::query_as::<_, Article>(&format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Article not found"))
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = required(title, "Title")?;
    max_len(&title, 200, "Title")?;
    Ok(title)
}

fn author_or_default(author: Option<String>) -> Result<String, AppError> {
    let author = author
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
    max_len(&author, 100, "Author")?;
    Ok(author)
}

// GET /admin/articles
pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    let articles = sqlx::query_as::<_, Article>(&format!(
        "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY date_posted DESC, id DESC"
    ))
    .fetch_all(&state.db_pool)
    .await?;
    Ok(Json(articles))
}

// GET /admin/articles/{id}
pub async fn get_article(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Article>, AppError> {
    Ok(Json(fetch_article(&state.db_pool, id).await?))
}

// POST /admin/articles
pub async fn create_article(
    State(state): State<AppState>,
    Json(req): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<Article>), AppError> {
    let title = validate_title(&req.title)?;
    let content = required(&req.content, "Content")?;
    let author = author_or_default(req.author)?;
    let image = image(req.image)?;
    let slug = article_slug(&state.db_pool, &title, None).await?;

    let article = sqlx::query_as::<_, Article>(&format!(
        "INSERT INTO articles (title, slug, content, author, image)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {ARTICLE_COLUMNS}"
    ))
    .bind(&title)
    .bind(&slug)
    .bind(&content)
    .bind(&author)
    .bind(&image)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, "An article with this title already exists"))?;

    info!(article_id = article.id, %slug, "Article created");
    Ok((StatusCode::CREATED, Json(article)))
}

// PUT /admin/articles/{id}
pub async fn update_article(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<UpdateArticleRequest>,
) -> Result<Json<Article>, AppError> {
    let current = fetch_article(&state.db_pool, id).await?;

    let (title, slug) = match req.title {
        Some(raw) => {
            let title = validate_title(&raw)?;
            let slug = article_slug(&state.db_pool, &title, Some(id)).await?;
            (title, slug)
        }
        None => (current.title, current.slug),
    };
    let content = match req.content {
        Some(raw) => required(&raw, "Content")?,
        None => current.content,
    };
    let author = match req.author {
        Some(raw) => author_or_default(Some(raw))?,
        None => current.author,
    };
    let image = match req.image {
        Some(raw) => image(Some(raw))?,
        None => current.image,
    };

    let article = sqlx::query_as::<_, Article>(&format!(
        "UPDATE articles SET title = $2, slug = $3, content = $4, author = $5, image = $6
         WHERE id = $1
         RETURNING {ARTICLE_COLUMNS}"
    ))
    .bind(id)
    .bind(&title)
    .bind(&slug)
    .bind(&content)
    .bind(&author)
    .bind(&image)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, "An article with this title already exists"))?;

    Ok(Json(article))
}

// DELETE /admin/articles/{id}
pub async fn delete_article(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Article not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_author_falls_back() {
        assert_eq!(author_or_default(None).unwrap(), "Admin");
        assert_eq!(author_or_default(Some("  ".into())).unwrap(), "Admin");
        assert_eq!(author_or_default(Some(" Lucía ".into())).unwrap(), "Lucía");
    }
}
