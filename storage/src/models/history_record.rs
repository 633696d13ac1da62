use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const EXCERPT_CHARS: usize = 200;

/// One classification event. Write-only audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryRecord {
    pub id: String,
    pub message_id: String,
    /// First 200 characters of the message text.
    pub text_excerpt: String,
    pub sentiment: String,
    pub source: String,
    pub sender: String,
    /// `ai` or `keyword_fallback` when the label came from the classifier; None when supplied.
    pub method: Option<String>,
    pub confidence: Option<f64>,
    /// Model identifier when the label came from the AI path.
    pub model_version: Option<String>,
    pub processing_ms: Option<i64>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(
        message_id: impl Into<String>,
        text: &str,
        sentiment: impl Into<String>,
        source: impl Into<String>,
        sender: impl Into<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message_id: message_id.into(),
            text_excerpt: text.chars().take(EXCERPT_CHARS).collect(),
            sentiment: sentiment.into(),
            source: source.into(),
            sender: sender.into(),
            method: None,
            confidence: None,
            model_version: None,
            processing_ms: None,
            user_id,
            created_at: Utc::now(),
        }
    }

    pub fn with_classification(
        mut self,
        method: impl Into<String>,
        confidence: Option<f64>,
        processing_ms: i64,
    ) -> Self {
        self.method = Some(method.into());
        self.confidence = confidence;
        self.processing_ms = Some(processing_ms);
        self
    }

    pub fn with_model_version(mut self, model_version: Option<String>) -> Self {
        self.model_version = model_version;
        self
    }
}
