//! [`SentimentStore`]: one pool shared by the four repositories.

use tracing::info;

use crate::alert_repo::AlertRepository;
use crate::error::StorageError;
use crate::history_repo::HistoryRepository;
use crate::message_repo::MessageRepository;
use crate::snapshot_repo::SnapshotRepository;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SentimentStore {
    pool_manager: SqlitePoolManager,
    pub messages: MessageRepository,
    pub alerts: AlertRepository,
    pub history: HistoryRepository,
    pub snapshots: SnapshotRepository,
}

impl SentimentStore {
    /// Opens (and creates, if needed) the database and all tables.
    pub async fn open(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;

        let messages = MessageRepository::with_pool(pool_manager.clone()).await?;
        let alerts = AlertRepository::with_pool(pool_manager.clone()).await?;
        let history = HistoryRepository::with_pool(pool_manager.clone()).await?;
        let snapshots = SnapshotRepository::with_pool(pool_manager.clone()).await?;

        info!("Sentiment store ready");
        Ok(Self {
            pool_manager,
            messages,
            alerts,
            history,
            snapshots,
        })
    }

    /// Round-trips a trivial query.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool_manager.close().await;
    }
}
