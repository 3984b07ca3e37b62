use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Affiliate {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub referral_link: String,
    pub is_active: bool,
}

/// One row per affiliate per calendar day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AffiliateStatistic {
    pub id: i64,
    pub affiliate_id: i64,
    pub affiliate_name: String,
    pub date: NaiveDate,
    pub clicks: i32,
    pub registrations: i32,
    pub sales: i32,
    pub commission_generated: Decimal,
    pub is_paid: bool,
}
