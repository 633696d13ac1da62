//! Insert payload as it arrives from a collector, and its validation.

use sentinel_core::{MessageSource, Priority, Result, SentinelError};
use serde::{Deserialize, Serialize};

/// A message as submitted. Every field is optional on the wire; [`IncomingMessage::validate`]
/// enforces the required ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    /// Older collectors send the label as `emotion`.
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMessage {
    pub id: String,
    pub text: String,
    pub source: MessageSource,
    pub sender: String,
    pub timestamp: String,
    /// Supplied label, if any. Blank labels count as absent.
    pub sentiment: Option<String>,
    pub priority: Option<Priority>,
    pub user_id: Option<String>,
    pub status: Option<String>,
}

fn required(field: &'static str, value: &Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(SentinelError::Validation(format!(
            "missing required field: {}",
            field
        ))),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl IncomingMessage {
    pub fn validate(&self) -> Result<ValidMessage> {
        let id = required("id", &self.id)?;
        let timestamp = required("timestamp", &self.timestamp)?;
        let source = required("source", &self.source)?.parse::<MessageSource>()?;
        let sender = required("sender", &self.sender)?;
        let text = required("text", &self.text)?;

        let priority = non_blank(&self.priority)
            .map(|p| p.parse::<Priority>())
            .transpose()?;

        Ok(ValidMessage {
            id,
            text,
            source,
            sender,
            timestamp,
            sentiment: non_blank(&self.sentiment).or_else(|| non_blank(&self.emotion)),
            priority,
            user_id: non_blank(&self.user_id),
            status: non_blank(&self.status),
        })
    }
}
