//! Unit tests for MessageRepository.
//!
//! Covers save/get_message_by_id, legacy `emotion` rows, label counts and negative-label lookup.

use chrono::{Duration, Utc};
use sentinel_core::MessageSource;
use tempfile::TempDir;

use crate::error::StorageError;
use crate::message_repo::MessageRepository;
use crate::models::{MessageQuery, MessageRecord};
use crate::sqlite_pool::SqlitePoolManager;

async fn open_repo(dir: &TempDir) -> MessageRepository {
    let path = dir.path().join("messages.db");
    MessageRepository::new(path.to_str().expect("utf-8 path"))
        .await
        .expect("Failed to create repository")
}

fn message(id: &str, sentiment: &str) -> MessageRecord {
    MessageRecord::new(
        id,
        format!("text of {}", id),
        MessageSource::Chat,
        "alice",
        "2024-03-01T10:15:00Z",
        sentiment,
    )
}

#[tokio::test]
async fn test_get_message_by_id_existing() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    let saved = message("m-1", "angry").with_user("u1");
    repo.save(&saved).await.expect("Failed to save message");

    let loaded = repo
        .get_message_by_id("m-1")
        .await
        .expect("Failed to get message")
        .expect("message present");

    assert_eq!(loaded.text, "text of m-1");
    assert_eq!(loaded.sentiment, "angry");
    assert_eq!(loaded.priority, "high");
    assert_eq!(loaded.user_id.as_deref(), Some("u1"));
    assert_eq!(loaded.status, "new");
    assert_eq!(loaded.timestamp_iso.as_deref(), Some("2024-03-01T10:15:00.000Z"));
}

#[tokio::test]
async fn test_duplicate_id_is_already_exists() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    repo.save(&message("dup", "happy")).await.unwrap();
    let err = repo.save(&message("dup", "angry")).await.unwrap_err();

    assert!(matches!(err, StorageError::AlreadyExists(id) if id == "dup"));
}

#[tokio::test]
async fn test_legacy_emotion_column_is_read_as_sentiment() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    repo.save(&message("legacy", "")).await.unwrap();
    sqlx::query("UPDATE messages SET sentiment = NULL, emotion = 'frustrated' WHERE id = 'legacy'")
        .execute(repo_pool(&repo))
        .await
        .unwrap();

    let loaded = repo.get_message_by_id("legacy").await.unwrap().unwrap();
    assert_eq!(loaded.sentiment, "frustrated");

    let negative = repo
        .get_messages_with_labels(&["frustrated"], None)
        .await
        .unwrap();
    assert_eq!(negative.len(), 1);
}

#[tokio::test]
async fn test_label_counts_respect_user_and_cutoff() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    let mut old = message("old", "Angry").with_user("u1");
    old.created_at = Utc::now() - Duration::hours(48);
    repo.save(&old).await.unwrap();
    repo.save(&message("new", "happy").with_user("u1")).await.unwrap();
    repo.save(&message("other", "happy").with_user("u2")).await.unwrap();

    let all = repo.label_counts(None, None).await.unwrap();
    assert_eq!(all, vec![("angry".to_string(), 1), ("happy".to_string(), 2)]);

    let u1 = repo.label_counts(Some("u1"), None).await.unwrap();
    assert_eq!(u1, vec![("angry".to_string(), 1), ("happy".to_string(), 1)]);

    let before = repo
        .label_counts(None, Some(Utc::now() - Duration::hours(24)))
        .await
        .unwrap();
    assert_eq!(before, vec![("angry".to_string(), 1)]);
}

#[tokio::test]
async fn test_get_messages_filters_and_paginates() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    for i in 0..5 {
        let mut m = message(&format!("m{}", i), if i % 2 == 0 { "angry" } else { "happy" });
        m.created_at = Utc::now() - Duration::minutes(10 - i);
        repo.save(&m).await.unwrap();
    }

    let angry = repo
        .get_messages(&MessageQuery {
            sentiment: Some("ANGRY".to_string()),
            ..MessageQuery::default()
        })
        .await
        .unwrap();
    let ids: Vec<_> = angry.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m4", "m2", "m0"]);

    let page = repo
        .get_messages(&MessageQuery {
            limit: Some(2),
            offset: Some(1),
            ..MessageQuery::default()
        })
        .await
        .unwrap();
    let ids: Vec<_> = page.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m3", "m2"]);
}

#[tokio::test]
async fn test_closed_pool_surfaces_database_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("closed.db");
    let manager = SqlitePoolManager::new(path.to_str().unwrap()).await.unwrap();
    let repo = MessageRepository::with_pool(manager.clone()).await.unwrap();

    manager.close().await;

    assert!(matches!(repo.count(None).await, Err(StorageError::Database(_))));
}

fn repo_pool(repo: &MessageRepository) -> &sqlx::SqlitePool {
    repo.pool_manager().pool()
}
