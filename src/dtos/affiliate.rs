use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateAffiliateRequest {
    pub name: String,
    pub email: String,
    pub referral_link: String,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateAffiliateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub referral_link: Option<String>,
    pub is_active: Option<bool>,
}
