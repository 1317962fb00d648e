//! Article date resolution.
//!
//! Dates come from front matter (TOML datetime or string) or, failing
//! that, from the `year`/`month`/`day` tokens of the source path. Values
//! without an offset are interpreted in the configured zone.

use crate::template::TokenMap;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// Local date-time layouts accepted besides RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Zoned layouts with a numeric offset that RFC 3339 rejects.
const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M %z"];

/// Parse a date string.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS] [+ZZZZ]` and `YYYY-MM-DD`.
pub fn parse(value: &str, zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date);
    }
    if let Some(date) = ZONED_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(value, f).ok())
    {
        return Some(date);
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
    {
        return localize(naive, zone);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| localize(date.and_time(NaiveTime::MIN), zone))
}

/// Read a front-matter value: a TOML datetime or a string.
///
/// Returns `Err` with a reason for values of the wrong type or shape.
pub fn from_value(
    value: &toml::Value,
    zone: FixedOffset,
) -> Result<DateTime<FixedOffset>, String> {
    let text = match value {
        toml::Value::Datetime(datetime) => datetime.to_string(),
        toml::Value::String(text) => text.clone(),
        other => return Err(format!("`date` must be a date, found {}", other.type_str())),
    };
    parse(&text, zone).ok_or_else(|| format!("`date` value `{text}` is not a recognized date"))
}

/// Midnight of the date spelled by the `year`/`month`/`day` path tokens.
pub fn from_tokens(tokens: &TokenMap, zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let year = tokens.get("year")?.parse().ok()?;
    let month = tokens.get("month")?.parse().ok()?;
    let day = tokens.get("day")?.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    localize(date.and_time(NaiveTime::MIN), zone)
}

fn localize(naive: NaiveDateTime, zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    naive.and_local_timezone(zone).single()
}
