// src/handlers/public.rs
//
// Visitor-facing pages served as JSON.
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{info, warn};

use crate::dtos::adsense::PublicAdsense;
use crate::dtos::category::{CategoryOverview, SubcategoryPage, SubcategoryWithCount};
use crate::dtos::contact::{ContactRequest, SubmissionAccepted};
use crate::dtos::page::{Page, PageQuery};
use crate::dtos::product::ProductSummary;
use crate::dtos::search::{SearchQuery, SearchResponse};
use crate::dtos::testimonial::{PublicTestimonial, PublicTestimonialRequest};
use crate::error::AppError;
use crate::handlers::advertisement::running_advertisements;
use crate::handlers::social_media::visible_links;
use crate::models::adsense_config::{AdsenseConfig, ADSENSE_COLUMNS};
use crate::models::advertisement::Advertisement;
use crate::models::article::{Article, ARTICLE_COLUMNS};
use crate::models::category::{Category, Subcategory};
use crate::models::product::{Product, PRODUCT_COLUMNS};
use crate::models::social_media_link::SocialMediaLink;
use crate::models::testimonial::{Testimonial, TESTIMONIAL_COLUMNS};
use crate::state::AppState;
use crate::utils::total_pages;
use crate::validation::{blank_to_none, looks_like_email};

const PRODUCTS_PER_PAGE: i64 = 9;
const GUIDES_PER_PAGE: i64 = 6;
const SEARCH_PER_PAGE: i64 = 9;
const SUMMARY_COLUMNS: &str = "id, name, slug, price, image, link";

const CONTACT_THANKS: &str =
    "¡Gracias! Tu mensaje ha sido enviado correctamente. Nos pondremos en contacto contigo pronto.";
const TESTIMONIAL_THANKS: &str =
    "¡Gracias por tu testimonio! Será revisado y, si es aprobado, aparecerá pronto en nuestra página.";

// GET /
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ProductSummary>>, AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&state.db_pool)
        .await?;
    let products = sqlx::query_as::<_, ProductSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM products ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
    ))
    .bind(PRODUCTS_PER_PAGE)
    .bind(query.offset(PRODUCTS_PER_PAGE))
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(Page::new(products, query.page(), PRODUCTS_PER_PAGE, total)))
}

// GET /product/{slug}
pub async fn product_detail(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Product>, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1"))
        .bind(&slug)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Producto no encontrado."))?;
    Ok(Json(product))
}

// GET /categories
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryOverview>>, AppError> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories ORDER BY name")
        .fetch_all(&state.db_pool)
        .await?;
    let subcategories = sqlx::query_as::<_, SubcategoryWithCount>(
        "SELECT s.id, s.name, s.slug, s.category_id, COUNT(p.id) AS product_count
         FROM subcategories s
         LEFT JOIN products p ON p.subcategory_id = s.id
         GROUP BY s.id
         ORDER BY s.name",
    )
    .fetch_all(&state.db_pool)
    .await?;

    let mut by_category: HashMap<i64, Vec<SubcategoryWithCount>> = HashMap::new();
    for sub in subcategories {
        by_category.entry(sub.category_id).or_default().push(sub);
    }

    let overview = categories
        .into_iter()
        .map(|c| CategoryOverview {
            subcategories: by_category.remove(&c.id).unwrap_or_default(),
            id: c.id,
            name: c.name,
            slug: c.slug,
        })
        .collect();

    Ok(Json(overview))
}

// GET /products/{subcategory_slug}
pub async fn products_by_subcategory(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<SubcategoryPage>, AppError> {
    let subcategory = sqlx::query_as::<_, Subcategory>(
        "SELECT id, name, slug, category_id FROM subcategories WHERE slug = $1",
    )
    .bind(&slug)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Subcategoría no encontrada."))?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE subcategory_id = $1")
        .bind(subcategory.id)
        .fetch_one(&state.db_pool)
        .await?;
    let products = sqlx::query_as::<_, ProductSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM products WHERE subcategory_id = $1
         ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(subcategory.id)
    .bind(PRODUCTS_PER_PAGE)
    .bind(query.offset(PRODUCTS_PER_PAGE))
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(SubcategoryPage {
        subcategory,
        products: Page::new(products, query.page(), PRODUCTS_PER_PAGE, total),
    }))
}

// GET /guides
pub async fn guides(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Article>>, AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(&state.db_pool)
        .await?;
    let articles = sqlx::query_as::<_, Article>(&format!(
        "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY date_posted DESC, id DESC LIMIT $1 OFFSET $2"
    ))
    .bind(GUIDES_PER_PAGE)
    .bind(query.offset(GUIDES_PER_PAGE))
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(Page::new(articles, query.page(), GUIDES_PER_PAGE, total)))
}

// GET /guide/{slug}
pub async fn guide_detail(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Article>, AppError> {
    let article = sqlx::query_as::<_, Article>(&format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = $1"))
        .bind(&slug)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Artículo no encontrado."))?;
    Ok(Json(article))
}

// GET /about
pub async fn about(State(state): State<AppState>) -> Result<Json<Vec<PublicTestimonial>>, AppError> {
    let testimonials = sqlx::query_as::<_, Testimonial>(&format!(
        "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE is_visible ORDER BY date_posted DESC, id DESC"
    ))
    .fetch_all(&state.db_pool)
    .await?;
    Ok(Json(testimonials.into_iter().map(PublicTestimonial::from).collect()))
}

fn is_spam(honeypot: &Option<String>) -> bool {
    honeypot.as_deref().is_some_and(|v| !v.trim().is_empty())
}

// POST /about - testimonials wait hidden for approval
pub async fn submit_testimonial(
    State(state): State<AppState>,
    Json(req): Json<PublicTestimonialRequest>,
) -> Result<(StatusCode, Json<SubmissionAccepted>), AppError> {
    let accepted = (StatusCode::CREATED, Json(SubmissionAccepted { message: TESTIMONIAL_THANKS }));

    if is_spam(&req.fax_number) {
        warn!("Honeypot filled on testimonial submission, dropping");
        return Ok(accepted);
    }

    let author = req.author.trim();
    let content = req.content.trim();
    let mut errors = BTreeMap::new();
    if author.is_empty() {
        errors.insert("author", "El nombre es obligatorio.".to_string());
    } else if author.chars().count() > 100 {
        errors.insert("author", "El nombre no puede superar los 100 caracteres.".to_string());
    }
    if content.is_empty() {
        errors.insert("content", "El testimonio es obligatorio.".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::FieldErrors(errors));
    }

    sqlx::query("INSERT INTO testimonials (author, content, is_visible) VALUES ($1, $2, FALSE)")
        .bind(author)
        .bind(content)
        .execute(&state.db_pool)
        .await?;

    info!("Testimonial submitted for review");
    Ok(accepted)
}

#[derive(Debug, PartialEq)]
struct NewContactMessage {
    name: String,
    email: String,
    subject: Option<String>,
    message: String,
}

fn validate_contact(req: ContactRequest) -> Result<NewContactMessage, BTreeMap<&'static str, String>> {
    let name = blank_to_none(req.name);
    let email = blank_to_none(req.email);
    let message = blank_to_none(req.message);

    let mut errors = BTreeMap::new();
    if name.is_none() {
        errors.insert("name", "El nombre es obligatorio.".to_string());
    }
    if !email.as_deref().is_some_and(looks_like_email) {
        errors.insert("email", "Introduce un correo electrónico válido.".to_string());
    }
    if message.is_none() {
        errors.insert("message", "El mensaje es obligatorio.".to_string());
    }

    match (name, email, message) {
        (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(NewContactMessage {
            name,
            email,
            subject: blank_to_none(req.subject),
            message,
        }),
        _ => Err(errors),
    }
}

// POST /contact
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<(StatusCode, Json<SubmissionAccepted>), AppError> {
    let accepted = (StatusCode::CREATED, Json(SubmissionAccepted { message: CONTACT_THANKS }));

    if is_spam(&req.fax_number) {
        warn!("Honeypot filled on contact form, dropping");
        return Ok(accepted);
    }

    let new = validate_contact(req).map_err(AppError::FieldErrors)?;

    sqlx::query("INSERT INTO contact_messages (name, email, subject, message) VALUES ($1, $2, $3, $4)")
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.subject)
        .bind(&new.message)
        .execute(&state.db_pool)
        .await?;

    info!("Contact message received");
    Ok(accepted)
}

/// `%term%` for ILIKE with the user's own wildcards escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// GET /search?q=&page=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let term = query.q.as_deref().map(str::trim).unwrap_or_default().to_string();
    let paging = PageQuery { page: query.page };
    let page = paging.page();

    if term.is_empty() {
        return Ok(Json(SearchResponse { query: term, products: vec![], articles: vec![], page, total_pages: 1 }));
    }

    let pattern = like_pattern(&term);
    let offset = paging.offset(SEARCH_PER_PAGE);

    let product_total: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE name ILIKE $1 OR description ILIKE $1")
            .bind(&pattern)
            .fetch_one(&state.db_pool)
            .await?;
    let products = sqlx::query_as::<_, ProductSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM products
         WHERE name ILIKE $1 OR description ILIKE $1
         ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(&pattern)
    .bind(SEARCH_PER_PAGE)
    .bind(offset)
    .fetch_all(&state.db_pool)
    .await?;

    let article_total: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE title ILIKE $1 OR content ILIKE $1")
            .bind(&pattern)
            .fetch_one(&state.db_pool)
            .await?;
    let articles = sqlx::query_as::<_, Article>(&format!(
        "SELECT {ARTICLE_COLUMNS} FROM articles
         WHERE title ILIKE $1 OR content ILIKE $1
         ORDER BY date_posted DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(&pattern)
    .bind(SEARCH_PER_PAGE)
    .bind(offset)
    .fetch_all(&state.db_pool)
    .await?;

    let total_pages = total_pages(product_total, SEARCH_PER_PAGE).max(total_pages(article_total, SEARCH_PER_PAGE));
    Ok(Json(SearchResponse { query: term, products, articles, page, total_pages }))
}

struct SitemapUrl {
    loc: String,
    lastmod: NaiveDate,
    changefreq: &'static str,
    priority: &'static str,
}

const STATIC_PAGES: [(&str, &str, &str); 5] = [
    ("/", "daily", "1.0"),
    ("/categories", "weekly", "0.8"),
    ("/guides", "weekly", "0.9"),
    ("/about", "monthly", "0.7"),
    ("/contact", "monthly", "0.6"),
];

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn render_sitemap(urls: &[SitemapUrl]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in urls {
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            xml_escape(&url.loc),
            url.lastmod.format("%Y-%m-%d"),
            url.changefreq,
            url.priority,
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

fn render_robots(base_url: &str) -> String {
    format!("User-agent: *\nAllow: /\nDisallow: /admin/\nSitemap: {base_url}/sitemap.xml\n")
}

// GET /sitemap.xml
pub async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let base = &state.config.site_base_url;
    let today = Local::now().date_naive();

    let mut urls: Vec<SitemapUrl> = STATIC_PAGES
        .iter()
        .map(|&(path, changefreq, priority)| SitemapUrl {
            loc: format!("{base}{path}"),
            lastmod: today,
            changefreq,
            priority,
        })
        .collect();

    let products: Vec<(String, DateTime<Utc>)> =
        sqlx::query_as("SELECT slug, updated_at FROM products ORDER BY id")
            .fetch_all(&state.db_pool)
            .await?;
    urls.extend(products.into_iter().map(|(slug, updated_at)| SitemapUrl {
        loc: format!("{base}/product/{slug}"),
        lastmod: updated_at.date_naive(),
        changefreq: "weekly",
        priority: "0.8",
    }));

    let subcategories: Vec<String> = sqlx::query_scalar("SELECT slug FROM subcategories ORDER BY id")
        .fetch_all(&state.db_pool)
        .await?;
    urls.extend(subcategories.into_iter().map(|slug| SitemapUrl {
        loc: format!("{base}/products/{slug}"),
        lastmod: today,
        changefreq: "weekly",
        priority: "0.7",
    }));

    let articles: Vec<(String, DateTime<Utc>)> =
        sqlx::query_as("SELECT slug, date_posted FROM articles ORDER BY id")
            .fetch_all(&state.db_pool)
            .await?;
    urls.extend(articles.into_iter().map(|(slug, posted)| SitemapUrl {
        loc: format!("{base}/guide/{slug}"),
        lastmod: posted.date_naive(),
        changefreq: "weekly",
        priority: "0.8",
    }));

    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], render_sitemap(&urls)))
}

// GET /robots.txt
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.config.site_base_url),
    )
}

// GET /site/advertisements
pub async fn site_advertisements(State(state): State<AppState>) -> Result<Json<Vec<Advertisement>>, AppError> {
    Ok(Json(running_advertisements(&state).await?))
}

// GET /site/adsense
pub async fn site_adsense(State(state): State<AppState>) -> Result<Json<PublicAdsense>, AppError> {
    let config = sqlx::query_as::<_, AdsenseConfig>(&format!(
        "SELECT {ADSENSE_COLUMNS} FROM adsense_configs ORDER BY id LIMIT 1"
    ))
    .fetch_optional(&state.db_pool)
    .await?;
    Ok(Json(config.map(PublicAdsense::from).unwrap_or_default()))
}

// GET /site/social-links
pub async fn site_social_links(State(state): State<AppState>) -> Result<Json<Vec<SocialMediaLink>>, AppError> {
    Ok(Json(visible_links(&state).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, email: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            subject: None,
            message: Some(message.into()),
            fax_number: None,
        }
    }

    #[test]
    fn contact_errors_are_per_field_in_spanish() {
        let errors = validate_contact(contact(" ", "ana", "")).unwrap_err();
        assert_eq!(errors["name"], "El nombre es obligatorio.");
        assert_eq!(errors["email"], "Introduce un correo electrónico válido.");
        assert_eq!(errors["message"], "El mensaje es obligatorio.");
    }

    #[test]
    fn valid_contact_is_trimmed() {
        let msg = validate_contact(contact(" Ana ", "ana@example.es", " Hola ")).unwrap();
        assert_eq!(msg.name, "Ana");
        assert_eq!(msg.message, "Hola");
        assert_eq!(msg.subject, None);
    }

    #[test]
    fn honeypot_detection() {
        assert!(is_spam(&Some("555-1234".into())));
        assert!(!is_spam(&Some("  ".into())));
        assert!(!is_spam(&None));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_pattern("laptop"), "%laptop%");
        assert_eq!(like_pattern("100%_off"), "%100\\%\\_off%");
    }

    #[test]
    fn sitemap_lists_every_url() {
        let day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let xml = render_sitemap(&[
            SitemapUrl { loc: "https://tienda.example/".into(), lastmod: day, changefreq: "daily", priority: "1.0" },
            SitemapUrl { loc: "https://tienda.example/guide/a&b".into(), lastmod: day, changefreq: "weekly", priority: "0.8" },
        ]);
        assert!(xml.starts_with("<?xml"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<loc>https://tienda.example/guide/a&amp;b</loc>"));
        assert!(xml.contains("<lastmod>2025-05-01</lastmod>"));
    }

    #[test]
    fn robots_points_at_sitemap() {
        let robots = render_robots("https://tienda.example");
        assert!(robots.contains("Sitemap: https://tienda.example/sitemap.xml"));
        assert!(robots.contains("Disallow: /admin/"));
    }
}
