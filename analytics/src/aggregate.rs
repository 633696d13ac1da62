//! Pure roll-ups over labelled messages: category overview and hourly trend buckets.
//!
//! Nothing here touches the store; [`crate::SentinelService`] fetches rows and hands them in.

use std::fmt::Display;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sentinel_core::{normalize, SentimentCategory};
use serde::{Deserialize, Serialize};

/// Count and share of one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub count: i64,
    pub percentage: i64,
    /// `"count/total (pct%)"`.
    pub percentage_text: String,
    pub total_messages: i64,
}

impl CategoryStat {
    fn new(count: i64, total: i64) -> Self {
        let percentage = percentage(count, total);
        Self {
            count,
            percentage,
            percentage_text: format!("{}/{} ({}%)", count, total, percentage),
            total_messages: total,
        }
    }
}

/// The four dashboard categories, always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionOverview {
    pub anger: CategoryStat,
    pub joy: CategoryStat,
    pub confusion: CategoryStat,
    pub neutral: CategoryStat,
}

impl EmotionOverview {
    pub fn get(&self, category: SentimentCategory) -> &CategoryStat {
        match category {
            SentimentCategory::Anger => &self.anger,
            SentimentCategory::Joy => &self.joy,
            SentimentCategory::Confusion => &self.confusion,
            SentimentCategory::Neutral => &self.neutral,
        }
    }

    pub fn total(&self) -> i64 {
        self.anger.total_messages
    }
}

impl Default for EmotionOverview {
    fn default() -> Self {
        overview_from_counts(std::iter::empty::<(&str, i64)>())
    }
}

/// `round(count / total * 100)` with ties to even; 0 when `total` is 0.
pub fn percentage(count: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round_ties_even() as i64
}

/// Folds raw-label counts into the four categories.
pub fn overview_from_counts<I, S>(label_counts: I) -> EmotionOverview
where
    I: IntoIterator<Item = (S, i64)>,
    S: AsRef<str>,
{
    let mut counts = CategoryCounts::default();
    for (label, count) in label_counts {
        counts.add(normalize(label.as_ref()), count);
    }
    let total = counts.total();

    EmotionOverview {
        anger: CategoryStat::new(counts.anger, total),
        joy: CategoryStat::new(counts.joy, total),
        confusion: CategoryStat::new(counts.confusion, total),
        neutral: CategoryStat::new(counts.neutral, total),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub anger: i64,
    pub joy: i64,
    pub confusion: i64,
    pub neutral: i64,
}

impl CategoryCounts {
    pub fn add(&mut self, category: SentimentCategory, n: i64) {
        match category {
            SentimentCategory::Anger => self.anger += n,
            SentimentCategory::Joy => self.joy += n,
            SentimentCategory::Confusion => self.confusion += n,
            SentimentCategory::Neutral => self.neutral += n,
        }
    }

    pub fn total(&self) -> i64 {
        self.anger + self.joy + self.confusion + self.neutral
    }
}

/// One hour of the trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendBucket {
    /// Bucket start, `HH:MM` in the dashboard's time zone.
    pub time: String,
    #[serde(flatten)]
    pub counts: CategoryCounts,
}

/// Longest trend or comparison window the service accepts: one leap year.
pub const MAX_WINDOW_HOURS: u32 = 24 * 366;

/// Buckets `points` into `hours + 1` consecutive one-hour windows starting at `now - hours`.
///
/// Bucket `i` covers `[start + i h, start + (i + 1) h)`. Points outside every bucket are ignored,
/// and empty buckets are kept with zero counts. A window reaching outside chrono's date range
/// yields an empty series.
pub fn hourly_trends<Tz>(
    points: &[(DateTime<Utc>, SentimentCategory)],
    now: DateTime<Tz>,
    hours: u32,
) -> Vec<TrendBucket>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let span = Duration::hours(i64::from(hours));
    let Some(start) = now.checked_sub_signed(span) else {
        return Vec::new();
    };

    let mut buckets: Vec<TrendBucket> = (0..=i64::from(hours))
        .filter_map(|i| start.clone().checked_add_signed(Duration::hours(i)))
        .map(|bucket_start| TrendBucket {
            time: bucket_start.format("%H:%M").to_string(),
            counts: CategoryCounts::default(),
        })
        .collect();

    let lower = start.with_timezone(&Utc);
    for (at, category) in points {
        if *at < lower {
            continue;
        }
        let index = (*at - lower).num_seconds() / 3600;
        if let Some(bucket) = usize::try_from(index).ok().and_then(|i| buckets.get_mut(i)) {
            bucket.counts.add(*category, 1);
        }
    }

    buckets
}
