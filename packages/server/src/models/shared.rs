use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a trimmed required text field (1 to `max` Unicode characters).
pub fn validate_text(value: &str, name: &str, max: usize) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{name} must be 1-{max} characters"
        )));
    }
    Ok(())
}

/// Validate an optional free-text field (at most `max` Unicode characters).
pub fn validate_optional_text(value: Option<&str>, name: &str, max: usize) -> Result<(), AppError> {
    if let Some(v) = value
        && v.trim().chars().count() > max
    {
        return Err(AppError::Validation(format!(
            "{name} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Validate an optional http(s) URL (at most 2048 characters).
pub fn validate_optional_url(value: Option<&str>, name: &str) -> Result<(), AppError> {
    if let Some(url) = value {
        if url.len() > 2048 || !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Validation(format!(
                "{name} must be an http(s) URL of at most 2048 characters"
            )));
        }
    }
    Ok(())
}

/// Validate an optional sub-rating (must lie in [0, 10] when present).
pub fn validate_rating(value: Option<f64>, name: &str) -> Result<(), AppError> {
    if let Some(v) = value
        && !(0.0..=10.0).contains(&v)
    {
        return Err(AppError::Validation(format!("{name} must be between 0 and 10")));
    }
    Ok(())
}

/// Validate a price in whole rupiah (1 to 1,000,000).
pub fn validate_price(price: u32) -> Result<(), AppError> {
    if !(1..=1_000_000).contains(&price) {
        return Err(AppError::Validation(
            "Price must be 1-1000000 rupiah".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_bounds() {
        assert!(validate_text("Mie Ayam Pak Budi", "Outlet name", 200).is_ok());
        assert!(validate_text("   ", "Outlet name", 200).is_err());
        assert!(validate_text(&"x".repeat(201), "Outlet name", 200).is_err());
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(None, "mie_tekstur").is_ok());
        assert!(validate_rating(Some(0.0), "mie_tekstur").is_ok());
        assert!(validate_rating(Some(10.0), "mie_tekstur").is_ok());
        assert!(validate_rating(Some(10.1), "mie_tekstur").is_err());
        assert!(validate_rating(Some(-0.1), "mie_tekstur").is_err());
    }

    #[test]
    fn url_scheme_and_length() {
        assert!(validate_optional_url(Some("https://maps.google.com/x"), "google_map_url").is_ok());
        assert!(validate_optional_url(Some("ftp://nope"), "google_map_url").is_err());
        let long = format!("https://e.com/{}", "a".repeat(2100));
        assert!(validate_optional_url(Some(&long), "google_map_url").is_err());
        assert!(validate_optional_url(None, "google_map_url").is_ok());
    }

    #[test]
    fn price_bounds() {
        assert!(validate_price(1).is_ok());
        assert!(validate_price(1_000_000).is_ok());
        assert!(validate_price(0).is_err());
        assert!(validate_price(1_000_001).is_err());
    }
}
