// src/validation.rs
use crate::error::AppError;

/// Trimmed value, or a validation error naming the field.
pub fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub fn max_len(value: &str, max: usize, field: &str) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

/// Blank optional text is stored as NULL.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/') && !host.contains(char::is_whitespace))
}

pub fn url(value: &str, field: &str) -> Result<String, AppError> {
    let value = required(value, field)?;
    if !is_http_url(&value) {
        return Err(AppError::validation(format!("{field} must be a valid http(s) URL")));
    }
    Ok(value)
}

/// Image references may be absolute URLs or site paths such as `/static/img/x.jpg`.
pub fn is_image_path(value: &str) -> bool {
    let value = value.trim();
    is_http_url(value) || value.starts_with('/') || value.starts_with("static/")
}

pub fn image(value: Option<String>) -> Result<Option<String>, AppError> {
    match blank_to_none(value) {
        Some(path) if !is_image_path(&path) => Err(AppError::validation(
            "Image URL must start with http://, https://, / or be a static/ path",
        )),
        other => Ok(other),
    }
}

pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims() {
        assert_eq!(required("  Widget ", "Name").unwrap(), "Widget");
        assert!(required("   ", "Name").is_err());
    }

    #[test]
    fn urls() {
        assert!(is_http_url("https://example.com/platformA"));
        assert!(is_http_url("http://localhost:8080/feed"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("example.com"));
    }

    #[test]
    fn image_paths() {
        assert!(is_image_path("/static/img/laptop.jpg"));
        assert!(is_image_path("static/uploads/a.png"));
        assert!(is_image_path("https://cdn.example.com/a.png"));
        assert!(!is_image_path("laptop.jpg"));
        assert_eq!(image(Some("  ".into())).unwrap(), None);
        assert!(image(Some("laptop.jpg".into())).is_err());
    }

    #[test]
    fn emails() {
        assert!(looks_like_email("ana@example.es"));
        assert!(!looks_like_email("ana.example.es"));
        assert!(!looks_like_email("@example.es"));
        assert!(!looks_like_email("ana@localhost"));
    }
}
