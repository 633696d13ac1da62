//! Daily and weekly roll-ups materialized into the snapshot collection.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Timelike, Utc};
use sentinel_core::labels::{self, NEGATIVE_RATIO_LABELS};
use serde::{Deserialize, Serialize};
use storage::MessageRecord;

pub const DAILY_SUMMARY: &str = "daily_summary";
pub const WEEKLY_SUMMARY: &str = "weekly_summary";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub by_sentiment: BTreeMap<String, i64>,
    pub by_source: BTreeMap<String, i64>,
    pub by_priority: BTreeMap<String, i64>,
}

impl Breakdown {
    fn add(&mut self, message: &MessageRecord) {
        *self
            .by_sentiment
            .entry(message.sentiment.trim().to_lowercase())
            .or_default() += 1;
        *self.by_source.entry(message.source.clone()).or_default() += 1;
        *self.by_priority.entry(message.priority.clone()).or_default() += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_messages: i64,
    pub breakdown: Breakdown,
    /// Local hour of ingestion (0-23) to count.
    pub hourly: BTreeMap<u32, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_messages: i64,
    pub breakdown: Breakdown,
    pub daily: BTreeMap<NaiveDate, i64>,
    pub alerts_by_severity: BTreeMap<String, i64>,
    pub total_alerts: i64,
    pub avg_messages_per_day: f64,
    /// Percent of messages with a label in the negative-ratio set.
    pub negative_ratio: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// UTC bounds of `[first, last + 1 day)` in local time.
pub fn local_day_bounds(first: NaiveDate, days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let to_utc = |date: NaiveDate| {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        Local
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
    };
    (to_utc(first), to_utc(first + Duration::days(days)))
}

/// Summary of `messages` ingested on `date`; None when there are none.
pub fn summarize_day<Tz: TimeZone>(
    messages: &[MessageRecord],
    date: NaiveDate,
    tz: &Tz,
) -> Option<DailySummary> {
    if messages.is_empty() {
        return None;
    }

    let mut breakdown = Breakdown::default();
    let mut hourly = BTreeMap::new();
    for message in messages {
        breakdown.add(message);
        *hourly
            .entry(message.created_at.with_timezone(tz).hour())
            .or_default() += 1;
    }

    Some(DailySummary {
        date,
        total_messages: messages.len() as i64,
        breakdown,
        hourly,
    })
}

/// Summary of the week starting `week_start`; None when no messages were ingested.
pub fn summarize_week<Tz: TimeZone>(
    messages: &[MessageRecord],
    alert_severity_counts: &[(String, i64)],
    week_start: NaiveDate,
    tz: &Tz,
) -> Option<WeeklySummary> {
    if messages.is_empty() {
        return None;
    }

    let total = messages.len() as i64;
    let mut breakdown = Breakdown::default();
    let mut daily = BTreeMap::new();
    let mut negative = 0i64;
    for message in messages {
        breakdown.add(message);
        *daily
            .entry(message.created_at.with_timezone(tz).date_naive())
            .or_default() += 1;
        if labels::contains(NEGATIVE_RATIO_LABELS, &message.sentiment) {
            negative += 1;
        }
    }

    let alerts_by_severity: BTreeMap<String, i64> = alert_severity_counts.iter().cloned().collect();
    let total_alerts = alerts_by_severity.values().sum();

    Some(WeeklySummary {
        week_start,
        week_end: week_start + Duration::days(6),
        total_messages: total,
        breakdown,
        daily,
        alerts_by_severity,
        total_alerts,
        avg_messages_per_day: round2(total as f64 / 7.0),
        negative_ratio: round2(negative as f64 / total as f64 * 100.0),
    })
}
