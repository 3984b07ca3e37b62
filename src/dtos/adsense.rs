use serde::{Deserialize, Serialize};

use crate::models::adsense_config::AdsenseConfig;

#[derive(Deserialize)]
pub struct UpdateAdsenseRequest {
    pub adsense_client_id: String,
    pub adsense_slot_header: Option<String>,
    pub adsense_slot_sidebar: Option<String>,
    pub adsense_slot_article_top: Option<String>,
    pub adsense_slot_article_bottom: Option<String>,
    pub is_active: bool,
}

/// What the public pages need to render ad units; blank strings when AdSense is off.
#[derive(Debug, Default, Serialize)]
pub struct PublicAdsense {
    pub adsense_client_id: String,
    pub adsense_slot_header: String,
    pub adsense_slot_sidebar: String,
    pub adsense_slot_article_top: String,
    pub adsense_slot_article_bottom: String,
}

impl From<AdsenseConfig> for PublicAdsense {
    fn from(c: AdsenseConfig) -> Self {
        if c.status != "active" {
            return Self::default();
        }
        Self {
            adsense_client_id: c.adsense_client_id,
            adsense_slot_header: c.adsense_slot_header.unwrap_or_default(),
            adsense_slot_sidebar: c.adsense_slot_sidebar.unwrap_or_default(),
            adsense_slot_article_top: c.adsense_slot_article_top.unwrap_or_default(),
            adsense_slot_article_bottom: c.adsense_slot_article_bottom.unwrap_or_default(),
        }
    }
}
