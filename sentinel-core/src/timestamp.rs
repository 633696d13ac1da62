//! Lenient timestamp parsing.
//!
//! Messages arrive with timestamps in whatever shape the upstream collector produced: RFC 3339,
//! RFC 2822 mail dates, naive ISO strings, SQL-style strings or unix epochs. Naive values are read
//! as local time.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{Result, SentinelError};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Parses `raw` into an instant, trying the known shapes in order.
///
/// Instants outside years 0000 to 9999 are rejected; [`to_iso`] only orders correctly inside them.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let dt = parse_any(raw)?;
    if !(0..=9999).contains(&dt.year()) {
        return Err(SentinelError::TimestampParse(format!(
            "'{}' is outside years 0000-9999",
            raw.trim()
        )));
    }
    Ok(dt)
}

fn parse_any(raw: &str) -> Result<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(SentinelError::TimestampParse("empty timestamp".to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return local_to_utc(naive, value);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return local_to_utc(naive, value);
        }
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = value.parse::<i64>() {
            // 13 digits and up are milliseconds.
            let parsed = if value.len() >= 13 {
                Utc.timestamp_millis_opt(n).single()
            } else {
                Utc.timestamp_opt(n, 0).single()
            };
            if let Some(dt) = parsed {
                return Ok(dt);
            }
        }
    }

    Err(SentinelError::TimestampParse(format!(
        "unrecognized timestamp '{}'",
        value
    )))
}

/// Parses `raw`, falling back to `fallback` when it cannot be read. The flag is true when parsing succeeded.
pub fn resolve_timestamp(raw: &str, fallback: DateTime<Utc>) -> (DateTime<Utc>, bool) {
    match parse_timestamp(raw) {
        Ok(dt) => (dt, true),
        Err(_) => (fallback, false),
    }
}

/// Fixed-width UTC ISO form used for stored instants, so string order equals time order.
pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn local_to_utc(naive: NaiveDateTime, raw: &str) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SentinelError::TimestampParse(format!("'{}' does not exist in local time", raw))
        })
}
