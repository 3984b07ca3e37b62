use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SocialMediaLink {
    pub id: i64,
    pub platform: String,
    pub url: String,
    pub icon_class: Option<String>,
    pub is_visible: bool,
    pub order_num: i32,
}

/// Font Awesome icon classes for the platforms the admin form offers.
const PLATFORM_ICONS: [(&str, &str); 12] = [
    ("Facebook", "fab fa-facebook-f"),
    ("Twitter", "fab fa-x-twitter"),
    ("Instagram", "fab fa-instagram"),
    ("LinkedIn", "fab fa-linkedin-in"),
    ("YouTube", "fab fa-youtube"),
    ("TikTok", "fab fa-tiktok"),
    ("WhatsApp", "fab fa-whatsapp"),
    ("Telegram", "fab fa-telegram-plane"),
    ("Pinterest", "fab fa-pinterest-p"),
    ("Snapchat", "fab fa-snapchat-ghost"),
    ("Discord", "fab fa-discord"),
    ("Reddit", "fab fa-reddit-alien"),
];

pub fn default_icon(platform: &str) -> Option<&'static str> {
    PLATFORM_ICONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(platform.trim()))
        .map(|(_, icon)| *icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_lookup_ignores_case() {
        assert_eq!(default_icon("youtube"), Some("fab fa-youtube"));
        assert_eq!(default_icon(" WhatsApp "), Some("fab fa-whatsapp"));
        assert_eq!(default_icon("Myspace"), None);
    }
}
