use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ApiError;
use crate::models::{BookingCreate, ClassCreate, NewClass};

const DATETIME_FORMAT_HINT: &str =
    "Invalid datetime format. Please use ISO 8601 format (YYYY-MM-DDTHH:MM:SS)";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("regex compiles")
});

/// Checks email syntax and returns the address with its domain lowercased.
pub fn validate_email(value: &str) -> Result<String, ApiError> {
    if value.len() <= 254 && EMAIL_REGEX.is_match(value) {
        let (local, domain) = value.rsplit_once('@').unwrap_or((value, ""));
        Ok(format!("{local}@{}", domain.to_ascii_lowercase()))
    } else {
        Err(ApiError::Validation(format!(
            "'{value}' is not a valid email address"
        )))
    }
}

/// Parses an ISO-8601 timestamp. Offset-carrying values are normalized to UTC,
/// a bare date means midnight.
pub fn parse_class_datetime(value: &str) -> Result<NaiveDateTime, ApiError> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Ok(with_offset.naive_utc());
    }
    if let Some(with_offset) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Ok(with_offset.naive_utc());
    }
    if let Some(parsed) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Ok(parsed);
    }
    if let Some(parsed) = parse_hour_only(value) {
        return Ok(parsed);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| ApiError::Validation(DATETIME_FORMAT_HINT.into()))
}

/// `YYYY-MM-DDTHH`: chrono refuses a time without minutes, so build it by hand.
fn parse_hour_only(value: &str) -> Option<NaiveDateTime> {
    let (date, hour) = value.split_once(['T', ' '])?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(hour, 0, 0)
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

pub fn validate_class(input: ClassCreate) -> Result<NewClass, ApiError> {
    require_text("name", &input.name)?;
    require_text("instructor", &input.instructor)?;
    if input.available_slots < 0 {
        return Err(ApiError::Validation(
            "availableSlots must be zero or greater".into(),
        ));
    }
    let date_time = parse_class_datetime(&input.date_time)?;

    Ok(NewClass {
        name: input.name,
        date_time,
        instructor: input.instructor,
        available_slots: input.available_slots,
    })
}

/// Returns the normalized client email to store.
pub fn validate_booking(input: &BookingCreate) -> Result<String, ApiError> {
    require_text("client_name", &input.client_name)?;
    validate_email(&input.client_email)
}
