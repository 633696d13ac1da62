//! Integration tests for [`analytics::SentinelService`].
//!
//! Every test runs against a fresh SQLite file in a `TempDir`. The classifier is offline (keyword
//! fallback) unless a test installs an in-process backend.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use analytics::{IncomingMessage, SentinelService, DAILY_SUMMARY, MAX_WINDOW_HOURS};
use async_trait::async_trait;
use chrono::{Duration, Local, Utc};
use emotion_classifier::{
    CompletionBackend, EmotionClassifier, SentimentAnalyzer, AI_CONFIDENCE, KEYWORD_CONFIDENCE,
};
use pattern_scorer::PatternScorer;
use sentinel_core::{SentimentCategory, SentinelError};
use storage::{MessageQuery, MessageRecord, SentimentStore};
use tempfile::TempDir;

async fn service_with(dir: &TempDir, analyzer: SentimentAnalyzer) -> SentinelService {
    let path = dir.path().join("sentinel.db");
    let store = SentimentStore::open(path.to_str().expect("utf-8 path"))
        .await
        .expect("Failed to open store");
    SentinelService::new(store, analyzer)
}

async fn offline_service(dir: &TempDir) -> SentinelService {
    service_with(dir, SentimentAnalyzer::default()).await
}

fn payload(id: &str, text: &str, sentiment: Option<&str>, user: Option<&str>) -> IncomingMessage {
    IncomingMessage {
        id: Some(id.to_string()),
        text: Some(text.to_string()),
        source: Some("chat".to_string()),
        sender: Some("customer@example.com".to_string()),
        timestamp: Some(Utc::now().to_rfc3339()),
        sentiment: sentiment.map(str::to_string),
        user_id: user.map(str::to_string),
        ..IncomingMessage::default()
    }
}

struct FailingBackend;

#[async_trait]
impl CompletionBackend for FailingBackend {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        anyhow::bail!("401 invalid api key")
    }

    fn model(&self) -> &str {
        "failing"
    }
}

struct GratefulBackend;

#[async_trait]
impl CompletionBackend for GratefulBackend {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok("grateful".to_string())
    }

    fn model(&self) -> &str {
        "gpt-4o-mini"
    }
}

/// **Test: Overview of anger, joy, joy.**
///
/// **Expected:** anger 1 (33%), joy 2 (67%), confusion and neutral present with 0.
#[tokio::test]
async fn test_overview_percentages() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;

    service.insert(&payload("a", "x", Some("angry"), None)).await.unwrap();
    service.insert(&payload("b", "x", Some("happy"), None)).await.unwrap();
    service.insert(&payload("c", "x", Some("delighted"), None)).await.unwrap();

    let overview = service.overview(None).await;
    assert_eq!((overview.anger.count, overview.anger.percentage), (1, 33));
    assert_eq!((overview.joy.count, overview.joy.percentage), (2, 67));
    assert_eq!(overview.joy.percentage_text, "2/3 (67%)");
    assert_eq!((overview.confusion.count, overview.confusion.percentage), (0, 0));
    assert_eq!((overview.neutral.count, overview.neutral.percentage), (0, 0));
}

/// **Test: Insert without a label classifies the text; history records the method.**
#[tokio::test]
async fn test_insert_classifies_missing_label() {
    let dir = TempDir::new().unwrap();
    let analyzer = SentimentAnalyzer::new(
        EmotionClassifier::new(Arc::new(FailingBackend), StdDuration::from_millis(500)),
        PatternScorer::default(),
    );
    let service = service_with(&dir, analyzer).await;

    let outcome = service
        .insert(&payload("m1", "This is unacceptable, I'm furious", None, None))
        .await
        .unwrap();
    assert_eq!(outcome.sentiment, "angry");
    assert_eq!(outcome.total_count, 1);
    assert!(outcome.alert_created);

    let stored = service.get_message("m1").await.unwrap().unwrap();
    assert_eq!(stored.sentiment, "angry");
    assert_eq!(stored.priority, "high");
    assert_eq!(stored.status, "new");

    let history = service.history(Some("m1"), 10).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].method.as_deref(), Some("keyword_fallback"));
    assert_eq!(history[0].confidence, Some(KEYWORD_CONFIDENCE));
    assert_eq!(history[0].model_version, None);
    assert!(history[0].processing_ms.is_some());
}

/// **Test: AI-labelled inserts record the model and its confidence in history.**
#[tokio::test]
async fn test_insert_records_model_version() {
    let dir = TempDir::new().unwrap();
    let analyzer = SentimentAnalyzer::new(
        EmotionClassifier::new(Arc::new(GratefulBackend), StdDuration::from_millis(500)),
        PatternScorer::default(),
    );
    let service = service_with(&dir, analyzer).await;

    let outcome = service
        .insert(&payload("m1", "Thanks for the quick fix", None, None))
        .await
        .unwrap();
    assert_eq!(outcome.sentiment, "grateful");

    let history = service.history(Some("m1"), 10).await;
    assert_eq!(history[0].method.as_deref(), Some("ai"));
    assert_eq!(history[0].confidence, Some(AI_CONFIDENCE));
    assert_eq!(history[0].model_version.as_deref(), Some("gpt-4o-mini"));
}

/// **Test: Supplied labels are stored as given (lower-cased) and skip the classifier.**
#[tokio::test]
async fn test_insert_keeps_supplied_label() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;

    let mut incoming = payload("m1", "I hate this", None, Some("u1"));
    incoming.emotion = Some("Worried".to_string());
    let outcome = service.insert(&incoming).await.unwrap();
    assert_eq!(outcome.sentiment, "worried");

    let stored = service.get_message("m1").await.unwrap().unwrap();
    assert_eq!(stored.priority, "medium");
    assert_eq!(stored.user_id.as_deref(), Some("u1"));
    assert!(service.history(Some("m1"), 10).await[0].method.is_none());
}

/// **Test: Missing required fields are rejected and nothing is stored.**
#[tokio::test]
async fn test_insert_validation_error() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;

    let mut incoming = payload("m1", "hello", None, None);
    incoming.sender = None;
    let err = service.insert(&incoming).await.unwrap_err();
    assert!(matches!(err, SentinelError::Validation(_)));
    assert_eq!(service.stats().await.total_messages, 0);
}

/// **Test: Re-inserting an id fails loudly.**
#[tokio::test]
async fn test_duplicate_insert_is_rejected() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;

    service.insert(&payload("dup", "x", Some("happy"), None)).await.unwrap();
    let err = service
        .insert(&payload("dup", "x", Some("angry"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, SentinelError::Validation(_)));
    assert!(service.active_alerts(None).await.is_empty());
}

/// **Test: "furious" raises one high alert, "confused" none.**
#[tokio::test]
async fn test_alert_generation() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;

    service.insert(&payload("f", "x", Some("furious"), None)).await.unwrap();
    service.insert(&payload("c", "x", Some("confused"), None)).await.unwrap();

    let alerts = service.active_alerts(None).await;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message_id, "f");
    assert_eq!(alerts[0].severity, "high");

    service.insert(&payload("f2", "x", Some("furious"), None)).await.unwrap();
    service.insert(&payload("u", "x", Some("upset"), None)).await.unwrap();
    let alerts = service.active_alerts(None).await;
    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts.iter().filter(|a| a.severity == "medium").count(), 1);
    assert_eq!(service.active_alerts(Some(0)).await.len(), 3);
    assert_eq!(service.active_alerts(Some(2)).await.len(), 2);
}

/// **Test: Trends over 3 hours yield 4 contiguous buckets.**
///
/// **Setup:** Messages 90 and 10 minutes ago, one 5 hours ago, one with an unparseable legacy
/// timestamp.
/// **Expected:** 4 buckets, counts summing to the 2 in-window messages.
#[tokio::test]
async fn test_trends_window() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;
    let now = Local::now();

    for (id, minutes_ago, label) in [("a", 90, "angry"), ("b", 10, "happy"), ("c", 300, "angry")] {
        let mut incoming = payload(id, "x", Some(label), None);
        incoming.timestamp = Some((Utc::now() - Duration::minutes(minutes_ago)).to_rfc3339());
        service.insert(&incoming).await.unwrap();
    }
    let mut legacy = MessageRecord::new("d", "x", sentinel_core::MessageSource::Email, "s", "garbage", "angry");
    legacy.timestamp_iso = None;
    service.store().messages.save(&legacy).await.unwrap();

    let buckets = service.trends_at(3, None, now).await;
    assert_eq!(buckets.len(), 4);
    let total: i64 = buckets.iter().map(|b| b.counts.total()).sum();
    assert_eq!(total, 2);
    assert_eq!(buckets[1].counts.anger, 1);
    assert_eq!(buckets[2].counts.joy, 1);
    assert_eq!(buckets[0].time, (now - Duration::hours(3)).format("%H:%M").to_string());
}

/// **Test: Oversized windows are capped instead of overflowing the clock.**
///
/// **Expected:** `u32::MAX` hours yields `MAX_WINDOW_HOURS + 1` buckets and a comparison whose
/// previous overview is empty.
#[tokio::test]
async fn test_oversized_window_is_capped() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;
    service.insert(&payload("a", "x", Some("angry"), None)).await.unwrap();

    let buckets = service.trends(u32::MAX, None).await;
    assert_eq!(buckets.len(), MAX_WINDOW_HOURS as usize + 1);
    let total: i64 = buckets.iter().map(|b| b.counts.total()).sum();
    assert_eq!(total, 1);

    let comparison = service.comparison(u32::MAX, None).await;
    assert_eq!(comparison.hours, MAX_WINDOW_HOURS);
    assert_eq!(comparison.current.total(), 1);
    assert_eq!(comparison.previous.total(), 0);
}

/// **Test: Reset for one user zeroes that user's overview only.**
#[tokio::test]
async fn test_reset_is_scoped_to_user() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;

    for i in 0..3 {
        service
            .insert(&payload(&format!("u1-{}", i), "x", Some("furious"), Some("u1")))
            .await
            .unwrap();
    }
    service.insert(&payload("u2-0", "x", Some("happy"), Some("u2"))).await.unwrap();

    let summary = service.reset(Some("u1")).await.unwrap();
    assert_eq!(summary.deleted_count, 3);
    assert_eq!(summary.alerts_deleted, 3);
    assert_eq!(summary.history_deleted, 3);

    let u1 = service.overview(Some("u1")).await;
    for category in SentimentCategory::ALL {
        assert_eq!(u1.get(category).count, 0);
    }
    assert_eq!(service.overview(Some("u2")).await.joy.count, 1);
    assert_eq!(service.overview(None).await.total(), 1);
}

/// **Test: Comparison's prior snapshot excludes freshly ingested messages.**
#[tokio::test]
async fn test_comparison() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;

    service.insert(&payload("a", "x", Some("angry"), None)).await.unwrap();
    let mut old = MessageRecord::new("old", "x", sentinel_core::MessageSource::Ticket, "s", "2024-01-01", "happy");
    old.created_at = Utc::now() - Duration::hours(30);
    service.store().messages.save(&old).await.unwrap();

    let comparison = service.comparison(24, None).await;
    assert_eq!(comparison.current.total(), 2);
    assert_eq!(comparison.previous.total(), 1);
    assert_eq!(comparison.previous.joy.count, 1);
}

/// **Test: Negative query uses the wider set and ignores positive labels.**
#[tokio::test]
async fn test_negative_messages() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;

    let mut early = payload("a", "x", Some("annoyed"), None);
    early.timestamp = Some("2024-03-01T08:00:00Z".to_string());
    service.insert(&early).await.unwrap();
    let mut late = payload("b", "x", Some("frustrated"), None);
    late.timestamp = Some("2024-03-01T09:00:00Z".to_string());
    service.insert(&late).await.unwrap();
    service.insert(&payload("c", "x", Some("happy"), None)).await.unwrap();

    let negative = service.negative_messages(None).await;
    let ids: Vec<_> = negative.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(service.negative_messages(Some(1)).await.len(), 1);
    assert_eq!(service.negative_messages(Some(0)).await.len(), 2);
    assert_eq!(service.negative_messages(Some(-1)).await.len(), 2);
    assert_eq!(service.history(None, 0).await.len(), 3);
    let unbounded = MessageQuery {
        limit: Some(0),
        ..MessageQuery::default()
    };
    assert_eq!(service.list_messages(&unbounded).await.unwrap().len(), 3);
}

/// **Test: Backfill labels unresolved rows with the pattern scorer when offline.**
#[tokio::test]
async fn test_backfill() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;
    let source = sentinel_core::MessageSource::Email;

    let rows = [
        ("angry-row", "I am absolutely furious with this service!", "unknown"),
        ("joy-row", "Thank you so much! This service is absolutely amazing!", ""),
        ("blank-row", "   ", "none"),
        ("done-row", "whatever", "happy"),
    ];
    for (id, text, label) in rows {
        let record = MessageRecord::new(id, text, source, "s", "2024-03-01", label);
        service.store().messages.save(&record).await.unwrap();
    }

    let report = service.backfill().await.unwrap();
    assert_eq!(report.updated, 2);
    assert_eq!(report.errors, 0);

    let angry = service.get_message("angry-row").await.unwrap().unwrap();
    assert_eq!(angry.category(), SentimentCategory::Anger);
    let joy = service.get_message("joy-row").await.unwrap().unwrap();
    assert_eq!(joy.category(), SentimentCategory::Joy);
    let done = service.get_message("done-row").await.unwrap().unwrap();
    assert_eq!(done.sentiment, "happy");
}

/// **Test: Daily snapshot is stored once per day and skipped when empty.**
#[tokio::test]
async fn test_daily_snapshot() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;
    let today = Local::now().date_naive();

    assert!(service.daily_snapshot(today).await.unwrap().is_none());

    service.insert(&payload("a", "x", Some("angry"), None)).await.unwrap();
    service.insert(&payload("b", "x", Some("happy"), None)).await.unwrap();

    let summary = service.daily_snapshot(today).await.unwrap().unwrap();
    assert_eq!(summary.total_messages, 2);
    service.daily_snapshot(today).await.unwrap();

    let stored = service.snapshots(DAILY_SUMMARY, 10).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].total_messages, 2);

    let weekly = service.weekly_snapshot(today).await.unwrap().unwrap();
    assert_eq!(weekly.total_alerts, 1);
    assert_eq!(weekly.negative_ratio, 50.0);
}

/// **Test: Dashboard reads degrade when the store is gone; inserts fail.**
#[tokio::test]
async fn test_store_unavailable() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;
    service.insert(&payload("a", "x", Some("angry"), None)).await.unwrap();

    service.store().close().await;

    let err = service
        .insert(&payload("b", "x", Some("happy"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, SentinelError::StoreUnavailable(_)));

    assert_eq!(service.overview(None).await.total(), 0);
    let buckets = service.trends(5, None).await;
    assert_eq!(buckets.len(), 6);
    assert!(buckets.iter().all(|b| b.counts.total() == 0));
    assert!(service.negative_messages(None).await.is_empty());

    let health = service.health().await;
    assert!(!health.is_healthy());
    assert!(health.error.is_some());
    assert_eq!(health.classifier, "offline");
}

/// **Test: Realtime stats count the current hour.**
#[tokio::test]
async fn test_realtime_stats() {
    let dir = TempDir::new().unwrap();
    let service = offline_service(&dir).await;

    service.insert(&payload("a", "x", Some("puzzled"), None)).await.unwrap();
    let mut old = payload("b", "x", Some("angry"), None);
    old.timestamp = Some((Utc::now() - Duration::hours(3)).to_rfc3339());
    service.insert(&old).await.unwrap();

    let stats = service.realtime_stats_at(Utc::now()).await;
    assert_eq!(stats.current_hour.confusion, 1);
    assert_eq!(stats.current_hour.anger, 0);
    assert_eq!(stats.total_messages, 2);
    assert!(stats.hour.ends_with(":00"));
}
