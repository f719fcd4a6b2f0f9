//! Lenient date parsing for externally supplied records.
//!
//! The dashboard's intake flows emit dates in more than one shape, so the
//! serde helpers here accept each of them while always serializing ISO forms.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

/// Calendar date formats accepted on input.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a calendar date (`YYYY-MM-DD` or `MM/DD/YYYY`).
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Parse an instant: RFC 3339, or a plain calendar date meaning midnight UTC.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = parse_calendar_date(value)?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid calendar date: {}", raw)))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_calendar_date(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid calendar date: {}", value))),
    }
}

pub(crate) fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).ok_or_else(|| de::Error::custom(format!("invalid instant: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_calendar_date_formats() {
        let iso = parse_calendar_date("1980-12-08").unwrap();
        let us = parse_calendar_date("12/08/1980").unwrap();
        assert_eq!(iso, us);
        assert_eq!(iso.year(), 1980);
        assert!(parse_calendar_date("08.12.1980").is_none());
    }

    #[test]
    fn test_parse_instant_plain_date_is_midnight_utc() {
        let instant = parse_instant("2025-02-21").unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-02-21T00:00:00+00:00");
    }

    #[test]
    fn test_parse_instant_rfc3339_with_offset() {
        let instant = parse_instant("2025-02-21T02:00:00+02:00").unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-02-21T00:00:00+00:00");
        assert!(parse_instant("yesterday").is_none());
    }
}
