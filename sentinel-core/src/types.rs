//! Closed enums for the dashboard-facing vocabulary, plus [`Sentiment`] which pairs an open raw
//! label with its canonical category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SentinelError;
use crate::labels::{self, ALERT_LABELS, CLARIFICATION_LABELS, HIGH_SEVERITY_LABELS};
use crate::normalizer::normalize;

/// One of the four canonical dashboard categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    Anger,
    Joy,
    Confusion,
    Neutral,
}

impl SentimentCategory {
    /// Dashboard order.
    pub const ALL: [SentimentCategory; 4] = [
        SentimentCategory::Anger,
        SentimentCategory::Joy,
        SentimentCategory::Confusion,
        SentimentCategory::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Anger => "anger",
            SentimentCategory::Joy => "joy",
            SentimentCategory::Confusion => "confusion",
            SentimentCategory::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel a message arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSource {
    Email,
    Chat,
    Ticket,
}

impl MessageSource {
    pub const ALL: [MessageSource; 3] = [MessageSource::Email, MessageSource::Chat, MessageSource::Ticket];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSource::Email => "email",
            MessageSource::Chat => "chat",
            MessageSource::Ticket => "ticket",
        }
    }
}

impl fmt::Display for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageSource {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(MessageSource::Email),
            "chat" => Ok(MessageSource::Chat),
            "ticket" => Ok(MessageSource::Ticket),
            other => Err(SentinelError::Validation(format!(
                "unknown source '{}', expected email, chat or ticket",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// High for alert labels, medium for labels asking for clarification, low otherwise.
    pub fn for_label(label: &str) -> Self {
        if labels::contains(ALERT_LABELS, label) {
            Priority::High
        } else if labels::contains(CLARIFICATION_LABELS, label) {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(SentinelError::Validation(format!(
                "unknown priority '{}', expected high, medium or low",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
}

impl AlertSeverity {
    pub fn for_label(label: &str) -> Self {
        if labels::contains(HIGH_SEVERITY_LABELS, label) {
            AlertSeverity::High
        } else {
            AlertSeverity::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::High => "high",
            AlertSeverity::Medium => "medium",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved sentiment: the open raw label (lower-cased) and its canonical category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: String,
    pub category: SentimentCategory,
}

impl Sentiment {
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        let category = normalize(&label);
        Self { label, category }
    }

    /// Alert policy: normalized anger and a raw label from the alert set.
    pub fn triggers_alert(&self) -> bool {
        self.category == SentimentCategory::Anger && labels::contains(ALERT_LABELS, &self.label)
    }

    pub fn priority(&self) -> Priority {
        Priority::for_label(&self.label)
    }

    pub fn severity(&self) -> AlertSeverity {
        AlertSeverity::for_label(&self.label)
    }
}
