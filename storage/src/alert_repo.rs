//! Alert repository: append-only negative-sentiment alerts.

use tracing::info;

use crate::error::StorageError;
use crate::models::AlertRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct AlertRepository {
    pool_manager: SqlitePoolManager,
}

impl AlertRepository {
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS alerts (
                id TEXT PRIMARY KEY,
                message_id TEXT NOT NULL,
                alert_type TEXT NOT NULL,
                sentiment TEXT NOT NULL,
                severity TEXT NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL,
                user_id TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_alerts_status ON alerts(status);
            CREATE INDEX IF NOT EXISTS idx_alerts_message_id ON alerts(message_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn save(&self, alert: &AlertRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO alerts (id, message_id, alert_type, sentiment, severity, description, status, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&alert.id)
        .bind(&alert.message_id)
        .bind(&alert.alert_type)
        .bind(&alert.sentiment)
        .bind(&alert.severity)
        .bind(&alert.description)
        .bind(&alert.status)
        .bind(&alert.user_id)
        .bind(alert.created_at)
        .execute(self.pool_manager.pool())
        .await
        .map_err(|e| StorageError::on_insert(e, &alert.id))?;

        info!(
            message_id = %alert.message_id,
            severity = %alert.severity,
            "Created alert"
        );
        Ok(())
    }

    /// Active alerts, newest first.
    pub async fn get_active(&self, limit: Option<i64>) -> Result<Vec<AlertRecord>, StorageError> {
        let mut sql =
            "SELECT * FROM alerts WHERE status = 'active' ORDER BY created_at DESC".to_string();
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        let alerts = sqlx::query_as::<_, AlertRecord>(&sql)
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(alerts)
    }

    pub async fn get_by_message(&self, message_id: &str) -> Result<Vec<AlertRecord>, StorageError> {
        let alerts = sqlx::query_as::<_, AlertRecord>(
            "SELECT * FROM alerts WHERE message_id = ? ORDER BY created_at",
        )
        .bind(message_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(alerts)
    }

    /// Alert count per severity over alerts created in `[start, end)`.
    pub async fn severity_counts_between(
        &self,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<(String, i64)>, StorageError> {
        let rows = sqlx::query_as(
            "SELECT severity, COUNT(*) FROM alerts WHERE created_at >= ? AND created_at < ? GROUP BY severity",
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(rows)
    }

    pub async fn delete_by_user(&self, user_id: Option<&str>) -> Result<u64, StorageError> {
        let pool = self.pool_manager.pool();
        let result = match user_id {
            Some(uid) => {
                sqlx::query("DELETE FROM alerts WHERE user_id = ?")
                    .bind(uid)
                    .execute(pool)
                    .await?
            }
            None => sqlx::query("DELETE FROM alerts").execute(pool).await?,
        };
        Ok(result.rows_affected())
    }
}
