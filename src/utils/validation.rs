//! Input validation and sanitization utilities
//!
//! Checks flag values before any request is built so bad input maps to the
//! validation exit code instead of a remote 400.

use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};

/// Requires an `http://` or `https://` URL.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "url".to_string(),
            reason: "cannot be empty".to_string(),
        });
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidValue {
            field: "url".to_string(),
            reason: format!("'{}' must start with http:// or https://", url),
        });
    }

    Ok(())
}

/// Rejects empty identifiers; `flag` names the offending argument.
pub fn require_value<'a>(flag: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingFlag {
            flag: flag.to_string(),
        });
    }
    Ok(trimmed)
}

/// Accepts RFC3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(label: &str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ValidationError::InvalidDate {
            label: label.to_string(),
            value: value.to_string(),
        })
}

/// Parses an optional date flag into the RFC3339 form the API expects.
pub fn optional_date(label: &str, value: Option<&str>) -> Result<Option<String>, ValidationError> {
    value
        .map(|v| parse_date(label, v).map(|d| d.to_rfc3339()))
        .transpose()
}

pub fn validate_page_size(page_size: u32) -> Result<u32, ValidationError> {
    if page_size == 0 || page_size > 250 {
        return Err(ValidationError::InvalidValue {
            field: "page-size".to_string(),
            reason: "must be between 1 and 250".to_string(),
        });
    }
    Ok(page_size)
}
