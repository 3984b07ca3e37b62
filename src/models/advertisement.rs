use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const ADVERTISEMENT_COLUMNS: &str = "id, type, title, is_active, text_content, button_text, button_url, \
     image_url, product_id, adsense_client_id, adsense_slot_id, start_date, end_date";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Advertisement {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub ad_type: String,
    pub title: String,
    pub is_active: bool,
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

impl Advertisement {
    /// Active and inside its optional start/end window.
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_date.map_or(true, |start| start <= now)
            && self.end_date.map_or(true, |end| end >= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ad(is_active: bool, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Advertisement {
        Advertisement {
            id: 1,
            ad_type: "banner".into(),
            title: "Oferta".into(),
            is_active,
            text_content: None,
            button_text: None,
            button_url: None,
            image_url: None,
            product_id: None,
            adsense_client_id: None,
            adsense_slot_id: None,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn running_window() {
        let now = Utc::now();
        let day = Duration::days(1);
        assert!(ad(true, None, None).is_running(now));
        assert!(ad(true, Some(now - day), Some(now + day)).is_running(now));
        assert!(!ad(true, Some(now + day), None).is_running(now));
        assert!(!ad(true, None, Some(now - day)).is_running(now));
        assert!(!ad(false, None, None).is_running(now));
    }
}
