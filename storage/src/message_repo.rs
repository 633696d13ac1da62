//! Message repository: persistence and queries for messages.
//!
//! Uses SqlitePoolManager and the models (MessageRecord, MessageQuery, MessageStats).
//! Every read goes through [`SELECT_COLUMNS`], which folds the legacy `emotion` column into
//! `sentiment`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteArguments;
use sqlx::query::QueryAs;
use sqlx::Sqlite;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::{MessageQuery, MessageRecord, MessageStats};
use crate::repository::Repository;
use crate::sqlite_pool::SqlitePoolManager;

const SELECT_COLUMNS: &str = "SELECT id, text, source, sender, timestamp, timestamp_iso, \
     COALESCE(NULLIF(sentiment, ''), emotion, '') AS sentiment, \
     priority, user_id, status, created_at FROM messages";

const RESOLVED_LABEL: &str = "LOWER(TRIM(COALESCE(NULLIF(sentiment, ''), emotion, '')))";

/// A bind value for dynamically assembled SQL.
enum Param {
    Text(String),
    Time(DateTime<Utc>),
}

fn bind_all<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    params: &'q [Param],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Param::Text(s) => query.bind(s.as_str()),
            Param::Time(t) => query.bind(*t),
        };
    }
    query
}

/// `?, ?, ?` for an IN list of `n` values.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[derive(Clone)]
pub struct MessageRepository {
    pool_manager: SqlitePoolManager,
}

impl MessageRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    #[cfg(test)]
    pub(crate) fn pool_manager(&self) -> &SqlitePoolManager {
        &self.pool_manager
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating messages table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                source TEXT NOT NULL,
                sender TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                timestamp_iso TEXT,
                sentiment TEXT,
                emotion TEXT,
                priority TEXT NOT NULL,
                user_id TEXT,
                status TEXT NOT NULL DEFAULT 'new',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_messages_user_id ON messages(user_id);
            CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at);
            CREATE INDEX IF NOT EXISTS idx_messages_timestamp_iso ON messages(timestamp_iso);
            CREATE INDEX IF NOT EXISTS idx_messages_source ON messages(source);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn save(&self, message: &MessageRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO messages (id, text, source, sender, timestamp, timestamp_iso, sentiment, priority, user_id, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.text)
        .bind(&message.source)
        .bind(&message.sender)
        .bind(&message.timestamp)
        .bind(&message.timestamp_iso)
        .bind(&message.sentiment)
        .bind(&message.priority)
        .bind(&message.user_id)
        .bind(&message.status)
        .bind(message.created_at)
        .execute(pool)
        .await
        .map_err(|e| StorageError::on_insert(e, &message.id))?;

        info!(
            id = %message.id,
            source = %message.source,
            sentiment = %message.sentiment,
            "Saved message"
        );
        Ok(())
    }

    /// Number of stored messages, optionally scoped to one user.
    pub async fn count(&self, user_id: Option<&str>) -> Result<i64, StorageError> {
        let pool = self.pool_manager.pool();
        let total: (i64,) = match user_id {
            Some(uid) => {
                sqlx::query_as("SELECT COUNT(*) FROM messages WHERE user_id = ?")
                    .bind(uid)
                    .fetch_one(pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM messages")
                    .fetch_one(pool)
                    .await?
            }
        };
        Ok(total.0)
    }

    /// Message count per raw label (lower-cased), optionally scoped to a user and to rows
    /// ingested before `created_before`.
    pub async fn label_counts(
        &self,
        user_id: Option<&str>,
        created_before: Option<DateTime<Utc>>,
    ) -> Result<Vec<(String, i64)>, StorageError> {
        let pool = self.pool_manager.pool();
        let mut sql = format!("SELECT {} AS label, COUNT(*) FROM messages WHERE 1=1", RESOLVED_LABEL);
        let mut params = Vec::new();

        if let Some(uid) = user_id {
            sql.push_str(" AND user_id = ?");
            params.push(Param::Text(uid.to_string()));
        }
        if let Some(cutoff) = created_before {
            sql.push_str(" AND created_at < ?");
            params.push(Param::Time(cutoff));
        }
        sql.push_str(" GROUP BY label ORDER BY label");

        let rows: Vec<(String, i64)> = bind_all(sqlx::query_as(&sql), &params)
            .fetch_all(pool)
            .await?;
        debug!(groups = rows.len(), "Computed label counts");
        Ok(rows)
    }

    pub async fn get_messages(
        &self,
        query: &MessageQuery,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();
        let mut sql = format!("{} WHERE 1=1", SELECT_COLUMNS);
        let mut params = Vec::new();

        if let Some(source) = &query.source {
            sql.push_str(" AND source = ?");
            params.push(Param::Text(source.to_lowercase()));
        }
        if let Some(sender) = &query.sender {
            sql.push_str(" AND sender = ?");
            params.push(Param::Text(sender.clone()));
        }
        if let Some(label) = &query.sentiment {
            sql.push_str(&format!(" AND {} = ?", RESOLVED_LABEL));
            params.push(Param::Text(label.trim().to_lowercase()));
        }
        if let Some(uid) = &query.user_id {
            sql.push_str(" AND user_id = ?");
            params.push(Param::Text(uid.clone()));
        }

        sql.push_str(" ORDER BY created_at DESC");

        match (query.limit, query.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset)),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        let messages: Vec<MessageRecord> = bind_all(sqlx::query_as(&sql), &params)
            .fetch_all(pool)
            .await?;
        info!("Retrieved {} messages", messages.len());

        Ok(messages)
    }

    pub async fn get_message_by_id(
        &self,
        message_id: &str,
    ) -> Result<Option<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);

        let message = sqlx::query_as::<_, MessageRecord>(&sql)
            .bind(message_id)
            .fetch_optional(pool)
            .await?;

        Ok(message)
    }

    /// Messages whose raw label is in `labels`, newest message time first.
    pub async fn get_messages_with_labels(
        &self,
        labels: &[&str],
        limit: Option<i64>,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }

        let pool = self.pool_manager.pool();
        let mut sql = format!(
            "{} WHERE {} IN ({}) ORDER BY timestamp_iso DESC, created_at DESC",
            SELECT_COLUMNS,
            RESOLVED_LABEL,
            placeholders(labels.len())
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let params: Vec<Param> = labels
            .iter()
            .map(|l| Param::Text(l.to_lowercase()))
            .collect();
        let messages = bind_all(sqlx::query_as(&sql), &params)
            .fetch_all(pool)
            .await?;
        Ok(messages)
    }

    /// Messages whose resolved label is missing or in `unresolved` (compared lower-cased).
    pub async fn get_unlabeled_messages(
        &self,
        unresolved: &[&str],
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();
        let sql = if unresolved.is_empty() {
            format!("{} WHERE {} = '' ORDER BY created_at", SELECT_COLUMNS, RESOLVED_LABEL)
        } else {
            format!(
                "{} WHERE {} = '' OR {} IN ({}) ORDER BY created_at",
                SELECT_COLUMNS,
                RESOLVED_LABEL,
                RESOLVED_LABEL,
                placeholders(unresolved.len())
            )
        };
        let params: Vec<Param> = unresolved
            .iter()
            .map(|l| Param::Text(l.to_lowercase()))
            .collect();
        let messages = bind_all(sqlx::query_as(&sql), &params)
            .fetch_all(pool)
            .await?;
        Ok(messages)
    }

    /// All messages for a user (or all users), for in-memory time bucketing.
    pub async fn get_timeline(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        self.get_messages(&MessageQuery {
            user_id: user_id.map(str::to_string),
            ..MessageQuery::default()
        })
        .await
    }

    /// Messages ingested in `[start, end)`.
    pub async fn get_messages_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();
        let sql = format!(
            "{} WHERE created_at >= ? AND created_at < ? ORDER BY created_at",
            SELECT_COLUMNS
        );
        let messages = sqlx::query_as::<_, MessageRecord>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?;
        Ok(messages)
    }

    /// Sets the label of one message. Priority and every other field stay as stored.
    pub async fn update_sentiment(&self, id: &str, sentiment: &str) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();
        let result = sqlx::query("UPDATE messages SET sentiment = ? WHERE id = ?")
            .bind(sentiment)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes the messages of one user, or every message when `user_id` is None.
    pub async fn delete_by_user(&self, user_id: Option<&str>) -> Result<u64, StorageError> {
        let pool = self.pool_manager.pool();
        let result = match user_id {
            Some(uid) => {
                sqlx::query("DELETE FROM messages WHERE user_id = ?")
                    .bind(uid)
                    .execute(pool)
                    .await?
            }
            None => sqlx::query("DELETE FROM messages").execute(pool).await?,
        };

        info!(
            user_id = user_id.unwrap_or("*"),
            deleted = result.rows_affected(),
            "Deleted messages"
        );
        Ok(result.rows_affected())
    }

    pub async fn get_stats(&self) -> Result<MessageStats, StorageError> {
        let pool = self.pool_manager.pool();

        let total_messages = self.count(None).await?;

        let by_source: Vec<(String, i64)> =
            sqlx::query_as("SELECT source, COUNT(*) FROM messages GROUP BY source")
                .fetch_all(pool)
                .await?;

        let by_sentiment = self.label_counts(None, None).await?;

        let unique_senders: (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT sender) FROM messages")
            .fetch_one(pool)
            .await?;

        let bounds: (Option<DateTime<Utc>>, Option<DateTime<Utc>>) =
            sqlx::query_as("SELECT MIN(created_at), MAX(created_at) FROM messages")
                .fetch_one(pool)
                .await?;

        Ok(MessageStats {
            total_messages,
            by_source: by_source.into_iter().collect::<BTreeMap<_, _>>(),
            by_sentiment: by_sentiment.into_iter().collect::<BTreeMap<_, _>>(),
            unique_senders: unique_senders.0,
            first_message: bounds.0,
            last_message: bounds.1,
        })
    }
}

#[async_trait]
impl Repository<MessageRecord> for MessageRepository {
    async fn save(&self, entity: &MessageRecord) -> Result<(), StorageError> {
        MessageRepository::save(self, entity).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MessageRecord>, StorageError> {
        self.get_message_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<MessageRecord>, StorageError> {
        self.get_messages(&MessageQuery::default()).await
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
