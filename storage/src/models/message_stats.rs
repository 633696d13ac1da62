//! Aggregate statistics for messages.
//!
//! Returned by MessageRepository::get_stats.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageStats {
    pub total_messages: i64,
    pub by_source: BTreeMap<String, i64>,
    pub by_sentiment: BTreeMap<String, i64>,
    pub unique_senders: i64,
    pub first_message: Option<DateTime<Utc>>,
    pub last_message: Option<DateTime<Utc>>,
}
