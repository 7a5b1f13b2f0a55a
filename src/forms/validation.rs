use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::ValidationError;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Trimmed value, or `Required` when blank
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(value.to_string())
}

/// Blank strings become `None`
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn email(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = required(field, value)?;
    if !EMAIL_REGEX.is_match(&value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(value)
}

pub fn non_negative_integer(field: &'static str, value: &str) -> Result<u32, ValidationError> {
    let value = required(field, value)?;
    value.parse::<u32>().map_err(|_| ValidationError::Invalid {
        field,
        reason: format!("'{}' is not a whole number", value),
    })
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD HH:MM`
pub fn date_time(field: &'static str, value: &str) -> Result<NaiveDateTime, ValidationError> {
    let value = required(field, value)?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Ok(dt.naive_utc());
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&value, fmt).ok())
        .ok_or_else(|| ValidationError::Invalid {
            field,
            reason: format!("'{}' is not a date and time (YYYY-MM-DD HH:MM)", value),
        })
}

pub fn date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let value = required(field, value)?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| ValidationError::Invalid {
        field,
        reason: format!("'{}' is not a date (YYYY-MM-DD)", value),
    })
}

/// Wire format for date-times sent to the server
pub fn format_date_time(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}
