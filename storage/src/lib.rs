//! Storage crate: SQLite persistence for messages, alerts, sentiment history and analytics
//! snapshots.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – MessageRecord, AlertRecord, HistoryRecord, SnapshotRecord, MessageQuery, MessageStats
//! - [`repository`] – Repository trait
//! - [`message_repo`] – MessageRepository (SQLite)
//! - [`alert_repo`], [`history_repo`], [`snapshot_repo`] – the append-only side collections
//! - [`store`] – SentimentStore, all four repositories over one pool
//! - [`sqlite_pool`] – SqlitePoolManager

mod alert_repo;
mod error;
mod history_repo;
mod message_repo;
mod models;
mod repository;
mod snapshot_repo;
mod sqlite_pool;
mod store;

#[cfg(test)]
mod message_repo_test;

pub use alert_repo::AlertRepository;
pub use error::StorageError;
pub use history_repo::HistoryRepository;
pub use message_repo::MessageRepository;
pub use models::{
    AlertRecord, HistoryRecord, MessageQuery, MessageRecord, MessageStats, SnapshotRecord,
    NEGATIVE_SENTIMENT_ALERT,
};
pub use repository::Repository;
pub use snapshot_repo::SnapshotRepository;
pub use sqlite_pool::SqlitePoolManager;
pub use store::SentimentStore;
