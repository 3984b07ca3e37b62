// src/utils.rs
use std::str::FromStr;

use rust_decimal::Decimal;
use unicode_normalization::UnicodeNormalization;

/// Currency symbols the external feeds are known to prefix prices with.
const CURRENCY_SYMBOLS: [char; 3] = ['$', '€', '£'];

/// URL-safe slug: accents folded to ASCII, punctuation dropped, runs of
/// whitespace and hyphens collapsed to a single `-`.
pub fn slugify(text: &str) -> String {
    let folded: String = text.nfkd().filter(char::is_ascii).collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for ch in folded.trim().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch.is_ascii_whitespace() {
            pending_dash = true;
        }
    }
    slug
}

/// Slug for `text`, or `fallback` when nothing slug-worthy survives.
pub fn slugify_or(text: &str, fallback: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() { fallback.to_string() } else { slug }
}

/// The `n`th candidate for `base` within `max_len` bytes: `base`, then `base-2`, `base-3`, ...
/// The base is cut, never the suffix. Slugs are ASCII so byte cuts are char cuts.
pub fn numbered_slug(base: &str, n: u32, max_len: usize) -> String {
    let suffix = if n <= 1 { String::new() } else { format!("-{n}") };
    let room = max_len.saturating_sub(suffix.len());
    let stem = base.get(..room.min(base.len())).unwrap_or(base).trim_end_matches('-');
    format!("{stem}{suffix}")
}

/// Parses a currency-formatted price such as `"$1,180.00"`, `"€75"` or `"1e3"`.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
        .map(|d| d.round_dp(2))
}

/// Number of pages needed for `total` rows; an empty listing still has one page.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic_names() {
        assert_eq!(slugify("Widget"), "widget");
        assert_eq!(slugify("Ultrabook Laptop X1 (Updated from A)"), "ultrabook-laptop-x1-updated-from-a");
        assert_eq!(slugify("  RGB   Mechanical -- Keyboard "), "rgb-mechanical-keyboard");
    }

    #[test]
    fn slugify_folds_spanish_accents() {
        assert_eq!(slugify("Auriculares Bluetooth Añejo Café"), "auriculares-bluetooth-anejo-cafe");
        assert_eq!(slugify("¿Guía de compra?"), "guia-de-compra");
    }

    #[test]
    fn slugify_drops_punctuation_without_dashing() {
        assert_eq!(slugify("v2.0 release!"), "v20-release");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify_or("!!!", "product"), "product");
    }

    #[test]
    fn parse_price_strips_symbols_and_grouping() {
        assert_eq!(parse_price("$10.50"), Some(Decimal::new(1050, 2)));
        assert_eq!(parse_price("$1,180"), Some(Decimal::from(1180)));
        assert_eq!(parse_price("€ 75"), Some(Decimal::from(75)));
        assert_eq!(parse_price("£2,499.99"), Some(Decimal::new(249999, 2)));
    }

    #[test]
    fn parse_price_rejects_garbage() {
        assert_eq!(parse_price("call us"), None);
        assert_eq!(parse_price("$"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn parse_price_accepts_exponent_notation() {
        assert_eq!(parse_price("1e3"), Some(Decimal::from(1000)));
        assert_eq!(parse_price("2.5E2"), Some(Decimal::from(250)));
    }

    #[test]
    fn numbered_slugs_stay_within_limit() {
        assert_eq!(numbered_slug("widget", 1, 200), "widget");
        assert_eq!(numbered_slug("widget", 3, 200), "widget-3");

        let long = "a".repeat(200);
        assert_eq!(numbered_slug(&long, 1, 200), long);
        let second = numbered_slug(&long, 2, 200);
        assert_eq!(second.len(), 200);
        assert!(second.ends_with("a-2"));
        assert_eq!(numbered_slug(&long, 10, 200).len(), 200);
    }

    #[test]
    fn numbered_slug_does_not_leave_double_dashes() {
        assert_eq!(numbered_slug("ab-cd", 2, 5), "ab-2");
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 9), 1);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
    }
}
