//! # analytics
//!
//! Message ingestion and dashboard roll-ups.
//!
//! - [`SentinelService`] – insert pipeline (validate, classify, persist, alert, history) and
//!   every read: overview, comparison, hourly trends, negative messages, alerts, stats.
//! - [`aggregate`] – pure overview/trend computations.
//! - [`snapshot`] – daily and weekly summaries.

pub mod aggregate;
mod payload;
mod reports;
mod service;
pub mod snapshot;

pub use aggregate::{CategoryCounts, CategoryStat, EmotionOverview, TrendBucket, MAX_WINDOW_HOURS};
pub use payload::{IncomingMessage, ValidMessage};
pub use reports::{
    BackfillReport, Comparison, HealthStatus, InsertOutcome, RealtimeStats, ResetSummary,
};
pub use service::{SentinelService, DEFAULT_COMPARISON_HOURS, DEFAULT_TREND_HOURS};
pub use snapshot::{DailySummary, WeeklySummary, DAILY_SUMMARY, WEEKLY_SUMMARY};
