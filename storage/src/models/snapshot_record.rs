use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;

/// Materialized rollup. `summary` holds the period-specific breakdown as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SnapshotRecord {
    pub id: String,
    /// `daily_summary` or `weekly_summary`.
    pub kind: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_messages: i64,
    pub summary: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SnapshotRecord {
    pub fn new<T: Serialize>(
        kind: impl Into<String>,
        period_start: NaiveDate,
        period_end: NaiveDate,
        total_messages: i64,
        summary: &T,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            kind: kind.into(),
            period_start,
            period_end,
            total_messages,
            summary: serde_json::to_string(summary)?,
            user_id: None,
            created_at: Utc::now(),
        })
    }

    pub fn summary<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        Ok(serde_json::from_str(&self.summary)?)
    }
}
