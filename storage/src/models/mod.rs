//! Row models for the four persisted collections.

mod alert_record;
mod history_record;
mod message_query;
mod message_record;
mod message_stats;
mod snapshot_record;

pub use alert_record::{AlertRecord, NEGATIVE_SENTIMENT_ALERT};
pub use history_record::HistoryRecord;
pub use message_query::MessageQuery;
pub use message_record::MessageRecord;
pub use message_stats::MessageStats;
pub use snapshot_record::SnapshotRecord;
