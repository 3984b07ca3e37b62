use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AppError;

pub const AD_TYPES: [&str; 5] = ["featured", "recommended", "best_seller", "sponsored", "relevant"];

#[derive(Debug, Clone, Deserialize)]
pub struct AdvertisementRequest {
    #[serde(rename = "type")]
    pub ad_type: String,
    pub title: String,
    pub is_active: Option<bool>,
    pub text_content: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub image_url: Option<String>,
    pub product_id: Option<i64>,
    pub adsense_client_id: Option<String>,
    pub adsense_slot_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl AdvertisementRequest {
    /// Each ad type needs its own content: a product or image for recommendations,
    /// copy for text ads, client and slot ids for AdSense placements.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("Ad title is required"));
        }

        match self.ad_type.as_str() {
            "recommended" => {
                if self.product_id.is_none() && !filled(&self.image_url) {
                    return Err(AppError::validation("You must select a product or provide an image URL."));
                }
            }
            "featured" | "best_seller" => {
                if !(filled(&self.text_content) || filled(&self.button_text) || filled(&self.button_url)) {
                    return Err(AppError::validation(
                        "For this ad type, text content, button text, or button URL is required.",
                    ));
                }
            }
            "sponsored" | "relevant" => {
                if !filled(&self.adsense_client_id) || !filled(&self.adsense_slot_id) {
                    return Err(AppError::validation(
                        "AdSense Client ID and Slot ID are required for this ad type.",
                    ));
                }
            }
            other => {
                return Err(AppError::validation(format!(
                    "Invalid ad type '{other}'. Use one of: {}",
                    AD_TYPES.join(", ")
                )));
            }
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start >= end {
                return Err(AppError::validation("End date must be after the start date."));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(ad_type: &str) -> AdvertisementRequest {
        AdvertisementRequest {
            ad_type: ad_type.to_string(),
            title: "Oferta".to_string(),
            is_active: None,
            text_content: None,
            button_text: None,
            button_url: None,
            image_url: None,
            product_id: None,
            adsense_client_id: None,
            adsense_slot_id: None,
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn recommended_needs_product_or_image() {
        assert!(request("recommended").validate().is_err());
        let mut ad = request("recommended");
        ad.product_id = Some(3);
        assert!(ad.validate().is_ok());
    }

    #[test]
    fn text_ads_need_copy() {
        assert!(request("featured").validate().is_err());
        let mut ad = request("best_seller");
        ad.button_text = Some("Comprar".into());
        assert!(ad.validate().is_ok());
    }

    #[test]
    fn adsense_ads_need_both_ids() {
        let mut ad = request("sponsored");
        ad.adsense_client_id = Some("ca-pub-1".into());
        assert!(ad.validate().is_err());
        ad.adsense_slot_id = Some("999".into());
        assert!(ad.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_type_and_inverted_window() {
        assert!(request("popup").validate().is_err());

        let mut ad = request("featured");
        ad.text_content = Some("Hola".into());
        let now = Utc::now();
        ad.start_date = Some(now);
        ad.end_date = Some(now - Duration::hours(1));
        assert!(ad.validate().is_err());
    }
}
