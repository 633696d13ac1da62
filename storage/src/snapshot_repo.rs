//! Analytics snapshots: daily and weekly rollups, replaced on recomputation.

use chrono::NaiveDate;
use tracing::info;

use crate::error::StorageError;
use crate::models::SnapshotRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SnapshotRepository {
    pool_manager: SqlitePoolManager,
}

impl SnapshotRepository {
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analytics_snapshots (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                period_start TEXT NOT NULL,
                period_end TEXT NOT NULL,
                total_messages INTEGER NOT NULL,
                summary TEXT NOT NULL,
                user_id TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_snapshots_kind_start ON analytics_snapshots(kind, period_start)",
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    /// Stores `snapshot`, replacing any earlier snapshot of the same kind and period start.
    pub async fn upsert(&self, snapshot: &SnapshotRecord) -> Result<(), StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        sqlx::query("DELETE FROM analytics_snapshots WHERE kind = ? AND period_start = ?")
            .bind(&snapshot.kind)
            .bind(snapshot.period_start)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO analytics_snapshots (id, kind, period_start, period_end, total_messages, summary, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&snapshot.id)
        .bind(&snapshot.kind)
        .bind(snapshot.period_start)
        .bind(snapshot.period_end)
        .bind(snapshot.total_messages)
        .bind(&snapshot.summary)
        .bind(&snapshot.user_id)
        .bind(snapshot.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            kind = %snapshot.kind,
            period_start = %snapshot.period_start,
            total = snapshot.total_messages,
            "Stored analytics snapshot"
        );
        Ok(())
    }

    pub async fn get(
        &self,
        kind: &str,
        period_start: NaiveDate,
    ) -> Result<Option<SnapshotRecord>, StorageError> {
        let snapshot = sqlx::query_as::<_, SnapshotRecord>(
            "SELECT * FROM analytics_snapshots WHERE kind = ? AND period_start = ?",
        )
        .bind(kind)
        .bind(period_start)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(snapshot)
    }

    /// Most recent period first.
    pub async fn list(&self, kind: &str, limit: i64) -> Result<Vec<SnapshotRecord>, StorageError> {
        let snapshots = sqlx::query_as::<_, SnapshotRecord>(
            "SELECT * FROM analytics_snapshots WHERE kind = ? ORDER BY period_start DESC LIMIT ?",
        )
        .bind(kind)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(snapshots)
    }

    pub async fn delete_by_user(&self, user_id: Option<&str>) -> Result<u64, StorageError> {
        let pool = self.pool_manager.pool();
        let result = match user_id {
            Some(uid) => {
                sqlx::query("DELETE FROM analytics_snapshots WHERE user_id = ?")
                    .bind(uid)
                    .execute(pool)
                    .await?
            }
            None => sqlx::query("DELETE FROM analytics_snapshots").execute(pool).await?,
        };
        Ok(result.rows_affected())
    }
}
