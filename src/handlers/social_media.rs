// src/handlers/social_media.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::dtos::social_media::{CreateSocialMediaRequest, UpdateSocialMediaRequest};
use crate::error::{map_constraint_violation, AppError};
use crate::models::social_media_link::{default_icon, SocialMediaLink};
use crate::state::AppState;
use crate::validation::{blank_to_none, max_len, required, url};

const COLUMNS: &str = "id, platform, url, icon_class, is_visible, order_num";
const FALLBACK_ICON: &str = "fas fa-link";
const DUPLICATE_PLATFORM: &str = "A link for this platform already exists";

/// An explicit icon wins, otherwise the platform's known icon, otherwise a generic link icon.
fn icon_for(platform: &str, icon_class: Option<String>) -> String {
    blank_to_none(icon_class)
        .unwrap_or_else(|| default_icon(platform).unwrap_or(FALLBACK_ICON).to_string())
}

fn validate_platform(platform: &str) -> Result<String, AppError> {
    let platform = required(platform, "Platform")?;
    max_len(&platform, 50, "Platform")?;
    Ok(platform)
}

// GET /admin/social-links
pub async fn list_links(State(state): State<AppState>) -> Result<Json<Vec<SocialMediaLink>>, AppError> {
    let links = sqlx::query_as::<_, SocialMediaLink>(&format!(
        "SELECT {COLUMNS} FROM social_media_links ORDER BY order_num, id"
    ))
    .fetch_all(&state.db_pool)
    .await?;
    Ok(Json(links))
}

// POST /admin/social-links
pub async fn create_link(
    State(state): State<AppState>,
    Json(req): Json<CreateSocialMediaRequest>,
) -> Result<(StatusCode, Json<SocialMediaLink>), AppError> {
    let platform = validate_platform(&req.platform)?;
    let link_url = url(&req.url, "URL")?;
    let icon_class = icon_for(&platform, req.icon_class);

    // New links go to the end of the list unless an order is given.
    let order_num = match req.order_num {
        Some(n) => n,
        None => {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM social_media_links")
                .fetch_one(&state.db_pool)
                .await?;
            i32::try_from(count).unwrap_or(i32::MAX)
        }
    };

    let link = sqlx::query_as::<_, SocialMediaLink>(&format!(
        "INSERT INTO social_media_links (platform, url, icon_class, is_visible, order_num)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(&platform)
    .bind(&link_url)
    .bind(&icon_class)
    .bind(req.is_visible.unwrap_or(true))
    .bind(order_num)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, DUPLICATE_PLATFORM))?;

    Ok((StatusCode::CREATED, Json(link)))
}

// PUT /admin/social-links/{id}
pub async fn update_link(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<UpdateSocialMediaRequest>,
) -> Result<Json<SocialMediaLink>, AppError> {
    let current = sqlx::query_as::<_, SocialMediaLink>(&format!(
        "SELECT {COLUMNS} FROM social_media_links WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Social media link not found"))?;

    let platform = match req.platform {
        Some(raw) => validate_platform(&raw)?,
        None => current.platform,
    };
    let link_url = match req.url {
        Some(raw) => url(&raw, "URL")?,
        None => current.url,
    };
    let icon_class = match req.icon_class {
        Some(raw) => icon_for(&platform, Some(raw)),
        None => current.icon_class.unwrap_or_else(|| icon_for(&platform, None)),
    };

    let link = sqlx::query_as::<_, SocialMediaLink>(&format!(
        "UPDATE social_media_links
         SET platform = $2, url = $3, icon_class = $4, is_visible = $5, order_num = $6
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(&platform)
    .bind(&link_url)
    .bind(&icon_class)
    .bind(req.is_visible.unwrap_or(current.is_visible))
    .bind(req.order_num.unwrap_or(current.order_num))
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_constraint_violation(e, DUPLICATE_PLATFORM))?;

    Ok(Json(link))
}

// DELETE /admin/social-links/{id}
pub async fn delete_link(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM social_media_links WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Social media link not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn visible_links(state: &AppState) -> Result<Vec<SocialMediaLink>, sqlx::Error> {
    sqlx::query_as::<_, SocialMediaLink>(&format!(
        "SELECT {COLUMNS} FROM social_media_links WHERE is_visible ORDER BY order_num, id"
    ))
    .fetch_all(&state.db_pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_defaults() {
        assert_eq!(icon_for("Instagram", None), "fab fa-instagram");
        assert_eq!(icon_for("Mastodon", Some("  ".into())), "fas fa-link");
        assert_eq!(icon_for("Instagram", Some("fab fa-custom".into())), "fab fa-custom");
    }
}
