use chrono::{DateTime, Utc};
use sentinel_core::AlertSeverity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NEGATIVE_SENTIMENT_ALERT: &str = "negative_sentiment";

/// Append-only alert raised for a negative message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AlertRecord {
    pub id: String,
    pub message_id: String,
    pub alert_type: String,
    pub sentiment: String,
    pub severity: String,
    pub description: String,
    pub status: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AlertRecord {
    pub fn negative_sentiment(
        message_id: impl Into<String>,
        sentiment: &str,
        severity: AlertSeverity,
        user_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message_id: message_id.into(),
            alert_type: NEGATIVE_SENTIMENT_ALERT.to_string(),
            sentiment: sentiment.to_string(),
            severity: severity.as_str().to_string(),
            description: format!("Negative sentiment detected: {}", sentiment),
            status: "active".to_string(),
            user_id,
            created_at: Utc::now(),
        }
    }
}
