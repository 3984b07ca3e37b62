use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateSocialMediaRequest {
    pub platform: String,
    pub url: String,
    pub icon_class: Option<String>,
    pub is_visible: Option<bool>,
    pub order_num: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateSocialMediaRequest {
    pub platform: Option<String>,
    pub url: Option<String>,
    pub icon_class: Option<String>,
    pub is_visible: Option<bool>,
    pub order_num: Option<i32>,
}
