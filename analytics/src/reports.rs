//! Result shapes returned by [`crate::SentinelService`].

use serde::{Deserialize, Serialize};

use crate::aggregate::{CategoryCounts, EmotionOverview};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertOutcome {
    pub message_id: String,
    /// Raw label stored with the message.
    pub sentiment: String,
    /// Messages in the store after the insert.
    pub total_count: i64,
    pub alert_created: bool,
}

/// Current and prior overviews; callers compute the delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub hours: u32,
    pub current: EmotionOverview,
    pub previous: EmotionOverview,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSummary {
    pub user_id: Option<String>,
    pub deleted_count: u64,
    pub alerts_deleted: u64,
    pub history_deleted: u64,
    pub snapshots_deleted: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillReport {
    pub updated: u64,
    pub errors: u64,
}

/// Category counts for the current clock hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeStats {
    /// `HH:00` of the current hour.
    pub hour: String,
    pub current_hour: CategoryCounts,
    pub total_messages: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub classifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
