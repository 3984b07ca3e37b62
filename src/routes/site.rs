use axum::{routing::{get, post}, Router};

use crate::handlers::public::{
    about, categories, guide_detail, guides, home, product_detail, products_by_subcategory, robots, search,
    site_adsense, site_advertisements, site_social_links, sitemap, submit_contact, submit_testimonial,
};
use crate::handlers::referral::track_referral;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/product/{slug}", get(product_detail))
        .route("/categories", get(categories))
        .route("/products/{subcategory_slug}", get(products_by_subcategory))
        .route("/guides", get(guides))
        .route("/guide/{slug}", get(guide_detail))
        .route("/about", get(about).post(submit_testimonial))
        .route("/contact", post(submit_contact))
        .route("/search", get(search))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .route("/site/advertisements", get(site_advertisements))
        .route("/site/adsense", get(site_adsense))
        .route("/site/social-links", get(site_social_links))
        .route("/ref/{affiliate_id}", get(track_referral))
}
