//! Sentiment history: one row per classification event.

use crate::error::StorageError;
use crate::models::HistoryRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct HistoryRepository {
    pool_manager: SqlitePoolManager,
}

impl HistoryRepository {
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sentiment_history (
                id TEXT PRIMARY KEY,
                message_id TEXT NOT NULL,
                text_excerpt TEXT NOT NULL,
                sentiment TEXT NOT NULL,
                source TEXT NOT NULL,
                sender TEXT NOT NULL,
                method TEXT,
                confidence REAL,
                model_version TEXT,
                processing_ms INTEGER,
                user_id TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_history_message_id ON sentiment_history(message_id)",
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    pub async fn save(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO sentiment_history (id, message_id, text_excerpt, sentiment, source, sender, method, confidence, model_version, processing_ms, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.message_id)
        .bind(&record.text_excerpt)
        .bind(&record.sentiment)
        .bind(&record.source)
        .bind(&record.sender)
        .bind(&record.method)
        .bind(record.confidence)
        .bind(&record.model_version)
        .bind(record.processing_ms)
        .bind(&record.user_id)
        .bind(record.created_at)
        .execute(self.pool_manager.pool())
        .await
        .map_err(|e| StorageError::on_insert(e, &record.id))?;
        Ok(())
    }

    /// Newest first; all messages when `message_id` is None.
    pub async fn list(
        &self,
        message_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, StorageError> {
        let pool = self.pool_manager.pool();
        let records = match message_id {
            Some(id) => {
                sqlx::query_as::<_, HistoryRecord>(
                    "SELECT * FROM sentiment_history WHERE message_id = ? ORDER BY created_at DESC LIMIT ?",
                )
                .bind(id)
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, HistoryRecord>(
                    "SELECT * FROM sentiment_history ORDER BY created_at DESC LIMIT ?",
                )
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
        };
        Ok(records)
    }

    pub async fn delete_by_user(&self, user_id: Option<&str>) -> Result<u64, StorageError> {
        let pool = self.pool_manager.pool();
        let result = match user_id {
            Some(uid) => {
                sqlx::query("DELETE FROM sentiment_history WHERE user_id = ?")
                    .bind(uid)
                    .execute(pool)
                    .await?
            }
            None => sqlx::query("DELETE FROM sentiment_history").execute(pool).await?,
        };
        Ok(result.rows_affected())
    }
}
