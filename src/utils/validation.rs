use crate::utils::error::{Result, SearchError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SearchError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SearchError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN fails both comparisons, so reject it explicitly through the negated form
    if !(value >= min && value <= max) {
        return Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_latitude(field_name: &str, value: f64) -> Result<()> {
    validate_range(field_name, value, -90.0, 90.0)
}

pub fn validate_longitude(field_name: &str, value: f64) -> Result<()> {
    validate_range(field_name, value, -180.0, 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("backend.url", "https://example.supabase.co").is_ok());
        assert!(validate_url("backend.url", "http://localhost:54321").is_ok());
        assert!(validate_url("backend.url", "").is_err());
        assert!(validate_url("backend.url", "invalid-url").is_err());
        assert!(validate_url("backend.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("location.timeout_seconds", 10, 1).is_ok());
        assert!(validate_positive_number("location.timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_latitude("lat", -23.5505).is_ok());
        assert!(validate_latitude("lat", 90.0).is_ok());
        assert!(validate_latitude("lat", 91.0).is_err());
        assert!(validate_latitude("lat", f64::NAN).is_err());
        assert!(validate_longitude("lon", -180.0).is_ok());
        assert!(validate_longitude("lon", 180.5).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("key".to_string());
        let absent: Option<String> = None;

        assert_eq!(
            validate_required_field("backend.anon_key", &present).unwrap(),
            "key"
        );
        assert!(matches!(
            validate_required_field("backend.anon_key", &absent),
            Err(SearchError::MissingConfigError { .. })
        ));
    }
}
