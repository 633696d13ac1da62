//! [`SentinelService`]: the insert pipeline and every dashboard query.
//!
//! Writes (insert, reset, backfill, snapshots) propagate store errors. Dashboard reads degrade to
//! zeroed or empty results and log the store error, so a dashboard always renders.

use std::fmt::Display;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Timelike, Utc};
use emotion_classifier::{AnalysisMethod, Classification, DetailedAnalysis, SentimentAnalyzer};
use sentinel_core::labels::{NEGATIVE_QUERY_LABELS, UNRESOLVED_LABELS};
use sentinel_core::{resolve_timestamp, to_iso, Result, Sentiment, SentimentCategory};
use storage::{
    AlertRecord, HistoryRecord, MessageQuery, MessageRecord, MessageStats, SentimentStore,
    SnapshotRecord,
};
use tracing::{debug, info, instrument, warn};

use crate::aggregate::{
    hourly_trends, overview_from_counts, CategoryCounts, EmotionOverview, TrendBucket,
    MAX_WINDOW_HOURS,
};
use crate::payload::IncomingMessage;
use crate::reports::{
    BackfillReport, Comparison, HealthStatus, InsertOutcome, RealtimeStats, ResetSummary,
};
use crate::snapshot::{
    local_day_bounds, summarize_day, summarize_week, week_start, DailySummary, WeeklySummary,
    DAILY_SUMMARY, WEEKLY_SUMMARY,
};

pub const DEFAULT_COMPARISON_HOURS: u32 = 24;
pub const DEFAULT_TREND_HOURS: u32 = 24;

/// Caps a caller-supplied window at [`MAX_WINDOW_HOURS`].
fn window_hours(hours: u32) -> u32 {
    hours.min(MAX_WINDOW_HOURS)
}

/// SQLite reads a negative `LIMIT` as no limit.
const UNBOUNDED: i64 = -1;

/// A limit of zero or below means no limit.
fn positive_limit(limit: Option<i64>) -> Option<i64> {
    limit.filter(|n| *n > 0)
}

#[derive(Clone)]
pub struct SentinelService {
    store: SentimentStore,
    analyzer: SentimentAnalyzer,
}

impl SentinelService {
    pub fn new(store: SentimentStore, analyzer: SentimentAnalyzer) -> Self {
        Self { store, analyzer }
    }

    pub fn store(&self) -> &SentimentStore {
        &self.store
    }

    pub fn analyzer(&self) -> &SentimentAnalyzer {
        &self.analyzer
    }

    /// Raw label for `text`; never fails.
    pub async fn classify(&self, text: &str) -> Classification {
        self.analyzer.classifier().classify(text).await
    }

    /// Dashboard category with confidence and reasoning; never fails.
    pub async fn analyze(&self, text: &str) -> DetailedAnalysis {
        self.analyzer.analyze_detailed(text).await
    }

    /// Validates, labels and stores one message, then records its alert and history entry.
    ///
    /// Fails with `Validation` for a bad payload and `StoreUnavailable` when the message could not
    /// be saved. Alert and history failures are logged only.
    #[instrument(skip(self, payload), fields(id = payload.id.as_deref().unwrap_or_default()))]
    pub async fn insert(&self, payload: &IncomingMessage) -> Result<InsertOutcome> {
        let message = payload.validate()?;

        let (label, classification) = match &message.sentiment {
            Some(label) => (label.clone(), None),
            None => {
                let classification = self.classify(&message.text).await;
                (classification.label.clone(), Some(classification))
            }
        };
        let sentiment = Sentiment::from_label(&label);

        let now = Utc::now();
        let (resolved, parsed) = resolve_timestamp(&message.timestamp, now);
        if !parsed {
            warn!(timestamp = %message.timestamp, "Unparseable timestamp, using ingestion time");
        }

        let record = MessageRecord {
            id: message.id,
            text: message.text,
            source: message.source.as_str().to_string(),
            sender: message.sender,
            timestamp: message.timestamp,
            timestamp_iso: Some(to_iso(resolved)),
            sentiment: sentiment.label.clone(),
            priority: message
                .priority
                .unwrap_or_else(|| sentiment.priority())
                .as_str()
                .to_string(),
            user_id: message.user_id,
            status: message.status.unwrap_or_else(|| "new".to_string()),
            created_at: now,
        };

        self.store.messages.save(&record).await?;

        let alert_created = self.record_alert(&record, &sentiment).await;
        self.record_history(&record, classification.as_ref()).await;

        let total_count = self.store.messages.count(None).await.unwrap_or_else(|e| {
            warn!(error = %e, "Could not count messages after insert");
            0
        });

        info!(
            id = %record.id,
            sentiment = %record.sentiment,
            category = %sentiment.category,
            alert_created,
            "Message ingested"
        );

        Ok(InsertOutcome {
            message_id: record.id,
            sentiment: record.sentiment,
            total_count,
            alert_created,
        })
    }

    async fn record_alert(&self, record: &MessageRecord, sentiment: &Sentiment) -> bool {
        if !sentiment.triggers_alert() {
            return false;
        }

        let alert = AlertRecord::negative_sentiment(
            &record.id,
            &sentiment.label,
            sentiment.severity(),
            record.user_id.clone(),
        );
        match self.store.alerts.save(&alert).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, message_id = %record.id, "Failed to create alert");
                false
            }
        }
    }

    async fn record_history(&self, record: &MessageRecord, classification: Option<&Classification>) {
        let mut entry = HistoryRecord::new(
            &record.id,
            &record.text,
            &record.sentiment,
            &record.source,
            &record.sender,
            record.user_id.clone(),
        );
        if let Some(c) = classification {
            entry = entry
                .with_classification(c.method.as_str(), Some(c.confidence), c.elapsed_ms as i64)
                .with_model_version(c.model.clone());
        }

        if let Err(e) = self.store.history.save(&entry).await {
            warn!(error = %e, message_id = %record.id, "Failed to record sentiment history");
        }
    }

    /// Category counts over all stored messages, or one user's.
    pub async fn overview(&self, user_id: Option<&str>) -> EmotionOverview {
        match self.store.messages.label_counts(user_id, None).await {
            Ok(counts) => overview_from_counts(counts),
            Err(e) => {
                warn!(error = %e, "Overview unavailable, returning zeros");
                EmotionOverview::default()
            }
        }
    }

    /// Current overview next to the overview of messages ingested more than `hours` ago.
    ///
    /// `hours` is capped at [`MAX_WINDOW_HOURS`].
    pub async fn comparison(&self, hours: u32, user_id: Option<&str>) -> Comparison {
        let hours = window_hours(hours);
        let current = self.overview(user_id).await;
        let previous = match Utc::now().checked_sub_signed(Duration::hours(i64::from(hours))) {
            Some(cutoff) => match self.store.messages.label_counts(user_id, Some(cutoff)).await {
                Ok(counts) => overview_from_counts(counts),
                Err(e) => {
                    warn!(error = %e, "Comparison snapshot unavailable, returning zeros");
                    EmotionOverview::default()
                }
            },
            None => EmotionOverview::default(),
        };

        Comparison {
            hours,
            current,
            previous,
        }
    }

    /// Hourly buckets for the last `hours` hours, labelled in local time.
    ///
    /// `hours` is capped at [`MAX_WINDOW_HOURS`].
    pub async fn trends(&self, hours: u32, user_id: Option<&str>) -> Vec<TrendBucket> {
        self.trends_at(hours, user_id, Local::now()).await
    }

    pub async fn trends_at<Tz>(
        &self,
        hours: u32,
        user_id: Option<&str>,
        now: DateTime<Tz>,
    ) -> Vec<TrendBucket>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let points = self.timeline(user_id).await;
        hourly_trends(&points, now, window_hours(hours))
    }

    /// `(instant, category)` per message with a usable timestamp.
    async fn timeline(&self, user_id: Option<&str>) -> Vec<(DateTime<Utc>, SentimentCategory)> {
        let records = match self.store.messages.get_timeline(user_id).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Timeline unavailable, returning empty series");
                return Vec::new();
            }
        };

        let total = records.len();
        let points: Vec<_> = records
            .iter()
            .filter_map(|r| r.resolved_at().map(|at| (at, r.category())))
            .collect();
        if points.len() < total {
            debug!(skipped = total - points.len(), "Excluded messages with unparseable timestamps");
        }
        points
    }

    /// Messages with a negative raw label, most recent first. A limit of 0 or below returns all.
    pub async fn negative_messages(&self, limit: Option<i64>) -> Vec<MessageRecord> {
        self.store
            .messages
            .get_messages_with_labels(NEGATIVE_QUERY_LABELS, positive_limit(limit))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Negative-sentiment query failed");
                Vec::new()
            })
    }

    pub async fn active_alerts(&self, limit: Option<i64>) -> Vec<AlertRecord> {
        self.store
            .alerts
            .get_active(positive_limit(limit))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Alert query failed");
                Vec::new()
            })
    }

    pub async fn history(&self, message_id: Option<&str>, limit: i64) -> Vec<HistoryRecord> {
        self.store
            .history
            .list(message_id, positive_limit(Some(limit)).unwrap_or(UNBOUNDED))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "History query failed");
                Vec::new()
            })
    }

    pub async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<MessageRecord>> {
        let query = MessageQuery {
            limit: positive_limit(query.limit),
            ..query.clone()
        };
        Ok(self.store.messages.get_messages(&query).await?)
    }

    pub async fn get_message(&self, id: &str) -> Result<Option<MessageRecord>> {
        Ok(self.store.messages.get_message_by_id(id).await?)
    }

    pub async fn stats(&self) -> MessageStats {
        self.store.messages.get_stats().await.unwrap_or_else(|e| {
            warn!(error = %e, "Stats unavailable, returning zeros");
            MessageStats::default()
        })
    }

    pub async fn realtime_stats(&self) -> RealtimeStats {
        self.realtime_stats_at(Local::now()).await
    }

    /// Category counts for the clock hour containing `now`.
    pub async fn realtime_stats_at<Tz>(&self, now: DateTime<Tz>) -> RealtimeStats
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let hour_start = now
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or_else(|| now.clone());
        let lower = hour_start.with_timezone(&Utc);
        let upper = lower + Duration::hours(1);

        let mut current_hour = CategoryCounts::default();
        for (at, category) in self.timeline(None).await {
            if at >= lower && at < upper {
                current_hour.add(category, 1);
            }
        }

        let total_messages = self.store.messages.count(None).await.unwrap_or_else(|e| {
            warn!(error = %e, "Could not count messages");
            0
        });

        RealtimeStats {
            hour: hour_start.format("%H:00").to_string(),
            current_hour,
            total_messages,
        }
    }

    pub async fn health(&self) -> HealthStatus {
        let classifier = self.analyzer.classifier();
        let (status, message_count, error) = match self.store.messages.count(None).await {
            Ok(n) => ("healthy", Some(n), None),
            Err(e) => ("unhealthy", None, Some(e.to_string())),
        };

        HealthStatus {
            status: status.to_string(),
            message_count,
            error,
            classifier: if classifier.is_online() { "online" } else { "offline" }.to_string(),
            model: classifier.model().map(str::to_string),
        }
    }

    /// Deletes messages, alerts, history and snapshots of one user, or everything.
    #[instrument(skip(self))]
    pub async fn reset(&self, user_id: Option<&str>) -> Result<ResetSummary> {
        let deleted_count = self.store.messages.delete_by_user(user_id).await?;
        let alerts_deleted = self.store.alerts.delete_by_user(user_id).await?;
        let history_deleted = self.store.history.delete_by_user(user_id).await?;
        let snapshots_deleted = self.store.snapshots.delete_by_user(user_id).await?;

        info!(
            deleted_count,
            alerts_deleted, history_deleted, snapshots_deleted, "Reset complete"
        );

        Ok(ResetSummary {
            user_id: user_id.map(str::to_string),
            deleted_count,
            alerts_deleted,
            history_deleted,
            snapshots_deleted,
        })
    }

    /// Classifies stored messages that have no usable label and writes the label back.
    pub async fn backfill(&self) -> Result<BackfillReport> {
        let pending = self
            .store
            .messages
            .get_unlabeled_messages(UNRESOLVED_LABELS)
            .await?;
        info!(pending = pending.len(), "Backfilling sentiment");

        let mut report = BackfillReport::default();
        for message in pending {
            if message.text.trim().is_empty() {
                continue;
            }

            let analysis = self.analyzer.analyze_detailed(&message.text).await;
            let label = match analysis.method {
                AnalysisMethod::Ai => analysis
                    .raw_label
                    .unwrap_or_else(|| analysis.sentiment.as_str().to_string()),
                AnalysisMethod::PatternMatching => analysis.sentiment.as_str().to_string(),
            };

            match self.store.messages.update_sentiment(&message.id, &label).await {
                Ok(true) => {
                    debug!(id = %message.id, label = %label, "Backfilled sentiment");
                    report.updated += 1;
                }
                Ok(false) => report.errors += 1,
                Err(e) => {
                    warn!(error = %e, id = %message.id, "Backfill update failed");
                    report.errors += 1;
                }
            }
        }

        info!(updated = report.updated, errors = report.errors, "Backfill finished");
        Ok(report)
    }

    /// Computes and stores the summary for local calendar day `date`.
    pub async fn daily_snapshot(&self, date: NaiveDate) -> Result<Option<DailySummary>> {
        let (start, end) = local_day_bounds(date, 1);
        let messages = self
            .store
            .messages
            .get_messages_created_between(start, end)
            .await?;

        let Some(summary) = summarize_day(&messages, date, &Local) else {
            info!(%date, "No messages, daily snapshot skipped");
            return Ok(None);
        };

        let record =
            SnapshotRecord::new(DAILY_SUMMARY, date, date, summary.total_messages, &summary)?;
        self.store.snapshots.upsert(&record).await?;
        Ok(Some(summary))
    }

    /// Computes and stores the summary for the Monday-start week containing `date`.
    pub async fn weekly_snapshot(&self, date: NaiveDate) -> Result<Option<WeeklySummary>> {
        let monday = week_start(date);
        let (start, end) = local_day_bounds(monday, 7);
        let messages = self
            .store
            .messages
            .get_messages_created_between(start, end)
            .await?;
        let alerts = self.store.alerts.severity_counts_between(start, end).await?;

        let Some(summary) = summarize_week(&messages, &alerts, monday, &Local) else {
            info!(%monday, "No messages, weekly snapshot skipped");
            return Ok(None);
        };

        let record = SnapshotRecord::new(
            WEEKLY_SUMMARY,
            summary.week_start,
            summary.week_end,
            summary.total_messages,
            &summary,
        )?;
        self.store.snapshots.upsert(&record).await?;
        Ok(Some(summary))
    }

    /// Stored snapshots of `kind`, most recent period first.
    pub async fn snapshots(&self, kind: &str, limit: i64) -> Vec<SnapshotRecord> {
        self.store
            .snapshots
            .list(kind, positive_limit(Some(limit)).unwrap_or(UNBOUNDED))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Snapshot query failed");
                Vec::new()
            })
    }
}
