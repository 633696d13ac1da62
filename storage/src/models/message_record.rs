//! Message record model for persistence.
//!
//! Maps to the `messages` table and is used by MessageRepository. Rows written before the
//! `sentiment` column existed carry their label in `emotion`; the repository reads both into
//! [`MessageRecord::sentiment`], so nothing above the storage layer sees the legacy column.

use chrono::{DateTime, Utc};
use sentinel_core::{normalize, parse_timestamp, resolve_timestamp, to_iso};
use sentinel_core::{MessageSource, Priority, SentimentCategory};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: String,
    pub text: String,
    pub source: String,
    pub sender: String,
    /// Timestamp exactly as supplied by the collector.
    pub timestamp: String,
    /// Normalized instant (RFC 3339, UTC). Falls back to ingestion time when `timestamp` is unparseable.
    pub timestamp_iso: Option<String>,
    /// Raw label from the open vocabulary.
    pub sentiment: String,
    pub priority: String,
    pub user_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    /// Creates a record stamped with the current time. Priority is derived from `sentiment`.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        source: MessageSource,
        sender: impl Into<String>,
        timestamp: impl Into<String>,
        sentiment: impl Into<String>,
    ) -> Self {
        let created_at = Utc::now();
        let timestamp = timestamp.into();
        let sentiment = sentiment.into();
        let (resolved, _) = resolve_timestamp(&timestamp, created_at);

        Self {
            id: id.into(),
            text: text.into(),
            source: source.as_str().to_string(),
            sender: sender.into(),
            timestamp,
            timestamp_iso: Some(to_iso(resolved)),
            priority: Priority::for_label(&sentiment).as_str().to_string(),
            sentiment,
            user_id: None,
            status: "new".to_string(),
            created_at,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority.as_str().to_string();
        self
    }

    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// The instant used for time bucketing, or None when neither timestamp field parses.
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp_iso
            .as_deref()
            .and_then(|iso| parse_timestamp(iso).ok())
            .or_else(|| parse_timestamp(&self.timestamp).ok())
    }

    pub fn category(&self) -> SentimentCategory {
        normalize(&self.sentiment)
    }
}
