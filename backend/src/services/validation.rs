//! Input shape checks shared by the gallery and image services.
//!
//! Every function returns `AppError::Validation` with a message naming the
//! offending field. Checks run before any ownership or uniqueness lookup.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::error::{AppError, Result};

pub const TITLE_MAX_LEN: usize = 200;
pub const SLUG_MAX_LEN: usize = 255;
pub const LIST_LIMIT_MAX: i64 = 100;
pub const LIST_LIMIT_DEFAULT: i64 = 20;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug pattern compiles"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

pub fn validate_title(title: &str) -> Result<()> {
    let len = title.chars().count();
    if len == 0 {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if len > TITLE_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Title must be at most {} characters",
            TITLE_MAX_LEN
        )));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(AppError::Validation("Slug is required".to_string()));
    }
    if slug.len() > SLUG_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Slug must be at most {} characters",
            SLUG_MAX_LEN
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(AppError::Validation(
            "Slug must contain only lowercase letters, numbers, and hyphens".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(field: &str, email: &str) -> Result<()> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err(AppError::Validation(format!("{} must be a valid email", field)));
    }
    Ok(())
}

/// Parse an ISO-8601 / RFC 3339 timestamp into UTC.
pub fn parse_datetime(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation(format!("{} must be an ISO 8601 datetime", field)))
}

/// Resolve list pagination, applying defaults and rejecting out-of-range values.
pub fn resolve_page(limit: Option<i64>, offset: Option<i64>) -> Result<(i64, i64)> {
    let limit = limit.unwrap_or(LIST_LIMIT_DEFAULT);
    if !(1..=LIST_LIMIT_MAX).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            LIST_LIMIT_MAX
        )));
    }
    let offset = offset.unwrap_or(0);
    if offset < 0 {
        return Err(AppError::Validation("offset must not be negative".to_string()));
    }
    Ok((limit, offset))
}

pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub fn validate_mime_type(mime_type: &str) -> Result<()> {
    match mime_type.split_once('/') {
        Some(("image", subtype)) if !subtype.is_empty() => Ok(()),
        _ => Err(AppError::Validation(format!(
            "Unsupported mime type: {}",
            mime_type
        ))),
    }
}

pub fn validate_dimension(field: &str, value: Option<i32>) -> Result<()> {
    match value {
        Some(v) if v <= 0 => Err(AppError::Validation(format!("{} must be positive", field))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_accepts_lowercase_digits_hyphens() {
        assert!(validate_slug("wedding-sarah-john").is_ok());
        assert!(validate_slug("2024-event-1").is_ok());
        assert!(validate_slug("-").is_ok());
    }

    #[test]
    fn test_slug_rejects_uppercase_and_punctuation() {
        for slug in ["Wedding!", "wedding_1", "wedding 1", "wédding", "WEDDING", ""] {
            let err = validate_slug(slug).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "slug {:?}", slug);
        }
    }

    #[test]
    fn test_slug_length_limit() {
        assert!(validate_slug(&"a".repeat(SLUG_MAX_LEN)).is_ok());
        assert!(validate_slug(&"a".repeat(SLUG_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("").is_err());
        assert!(validate_title("W").is_ok());
        assert!(validate_title(&"ü".repeat(TITLE_MAX_LEN)).is_ok());
        assert!(validate_title(&"x".repeat(TITLE_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("clientEmail", "sarah@example.com").is_ok());
        assert!(validate_email("clientEmail", "first.last+tag@mail.example.co").is_ok());
        assert!(validate_email("clientEmail", "not-an-email").is_err());
        assert!(validate_email("clientEmail", "a@b").is_err());
        assert!(validate_email("clientEmail", "@example.com").is_err());
    }

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("eventDate", "2025-06-14T15:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-14T15:30:00+00:00");

        let offset = parse_datetime("eventDate", "2025-06-14T17:30:00+02:00").unwrap();
        assert_eq!(offset, dt);

        assert!(parse_datetime("eventDate", "June 14th").is_err());
        assert!(parse_datetime("eventDate", "2025-06-14").is_err());
    }

    #[test]
    fn test_resolve_page_defaults_and_bounds() {
        assert_eq!(resolve_page(None, None).unwrap(), (20, 0));
        assert_eq!(resolve_page(Some(100), Some(40)).unwrap(), (100, 40));
        assert!(resolve_page(Some(0), None).is_err());
        assert!(resolve_page(Some(101), None).is_err());
        assert!(resolve_page(None, Some(-1)).is_err());
    }

    #[test]
    fn test_mime_type() {
        assert!(validate_mime_type("image/jpeg").is_ok());
        assert!(validate_mime_type("image/x-canon-cr3").is_ok());
        assert!(validate_mime_type("video/mp4").is_err());
        assert!(validate_mime_type("image/").is_err());
        assert!(validate_mime_type("jpeg").is_err());
    }

    #[test]
    fn test_dimension() {
        assert!(validate_dimension("width", None).is_ok());
        assert!(validate_dimension("width", Some(6000)).is_ok());
        assert!(validate_dimension("width", Some(0)).is_err());
    }
}
