use serde::Serialize;

#[derive(Serialize, sqlx::FromRow)]
pub struct DashboardResponse {
    pub product_count: i64,
    pub category_count: i64,
    pub article_count: i64,
    pub unread_messages_count: i64,
    pub pending_testimonials_count: i64,
    pub affiliate_count: i64,
    pub affiliate_statistic_count: i64,
}
