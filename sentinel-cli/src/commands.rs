//! Command handlers. Results go to stdout as pretty JSON; logs go to stderr and the log file.

use std::fs;
use std::path::Path;

use analytics::{IncomingMessage, InsertOutcome, SentinelService};
use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use emotion_classifier::{EmotionClassifier, SentimentAnalyzer};
use pattern_scorer::PatternScorer;
use serde::Serialize;
use storage::{MessageQuery, MessageRecord, SentimentStore};
use tracing::{info, warn};

use crate::cli::{Commands, Period};
use crate::config::SentinelConfig;

/// Opens the store and wires the classifier from `config`.
pub async fn build_service(config: &SentinelConfig) -> Result<SentinelService> {
    let store = SentimentStore::open(&config.database_url)
        .await
        .with_context(|| format!("Open database {}", config.database_url))?;
    let classifier = EmotionClassifier::from_config(&config.classifier);
    let analyzer = SentimentAnalyzer::new(classifier, PatternScorer::default());
    Ok(SentinelService::new(store, analyzer))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum BatchItem {
    Stored(InsertOutcome),
    Failed { id: Option<String>, error: String },
}

/// Reads one payload or an array of payloads from a JSON file.
pub fn read_payloads(path: &Path) -> Result<Vec<IncomingMessage>> {
    let raw = fs::read_to_string(path).with_context(|| format!("Read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("Parse JSON in {}", path.display()))?;
    let payloads = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(payloads)
}

async fn ingest_batch(service: &SentinelService, payloads: Vec<IncomingMessage>) -> Result<()> {
    let mut items = Vec::with_capacity(payloads.len());
    let mut failed = 0usize;
    for payload in payloads {
        match service.insert(&payload).await {
            Ok(outcome) => items.push(BatchItem::Stored(outcome)),
            Err(e) => {
                warn!(error = %e, id = ?payload.id, "Ingest failed");
                failed += 1;
                items.push(BatchItem::Failed {
                    id: payload.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    print_json(&items)?;
    if failed > 0 {
        bail!("{} of {} messages were not stored", failed, items.len());
    }
    Ok(())
}

pub async fn run(command: Commands, service: &SentinelService) -> Result<()> {
    match command {
        Commands::Ingest {
            file,
            id,
            text,
            source,
            sender,
            timestamp,
            sentiment,
            user,
        } => {
            if let Some(path) = file {
                let payloads = read_payloads(&path)?;
                info!(count = payloads.len(), file = %path.display(), "Ingesting batch");
                return ingest_batch(service, payloads).await;
            }
            let Some(text) = text else {
                bail!("either --file or --text is required");
            };
            let payload = IncomingMessage {
                id: Some(id.unwrap_or_else(MessageRecord::generate_id)),
                text: Some(text),
                source: Some(source),
                sender: Some(sender),
                timestamp: Some(timestamp.unwrap_or_else(|| Utc::now().to_rfc3339())),
                sentiment,
                user_id: user,
                ..IncomingMessage::default()
            };
            print_json(&service.insert(&payload).await?)
        }
        Commands::Classify { text } => print_json(&service.classify(&text).await),
        Commands::Analyze { text } => print_json(&service.analyze(&text).await),
        Commands::Overview { user } => print_json(&service.overview(user.as_deref()).await),
        Commands::Compare { hours, user } => {
            print_json(&service.comparison(hours, user.as_deref()).await)
        }
        Commands::Trends { hours, user } => {
            print_json(&service.trends(hours, user.as_deref()).await)
        }
        Commands::Negative { limit } => print_json(&service.negative_messages(limit).await),
        Commands::Alerts { limit } => print_json(&service.active_alerts(limit).await),
        Commands::Messages {
            id: Some(id), ..
        } => match service.get_message(&id).await? {
            Some(message) => print_json(&message),
            None => bail!("message not found: {}", id),
        },
        Commands::Messages {
            id: None,
            source,
            sender,
            sentiment,
            user,
            limit,
            offset,
        } => {
            let query = MessageQuery {
                source,
                sender,
                sentiment,
                user_id: user,
                limit: Some(limit),
                offset: Some(offset),
            };
            print_json(&service.list_messages(&query).await?)
        }
        Commands::Stats { realtime: true } => print_json(&service.realtime_stats().await),
        Commands::Stats { realtime: false } => print_json(&service.stats().await),
        Commands::History { message_id, limit } => {
            print_json(&service.history(message_id.as_deref(), limit).await)
        }
        Commands::Reset { user, yes } => {
            if !yes {
                bail!("reset deletes data irreversibly; pass --yes to confirm");
            }
            print_json(&service.reset(user.as_deref()).await?)
        }
        Commands::Backfill => print_json(&service.backfill().await?),
        Commands::Snapshot { period, date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            match period {
                Period::Daily => print_json(&service.daily_snapshot(date).await?),
                Period::Weekly => print_json(&service.weekly_snapshot(date).await?),
            }
        }
        Commands::Snapshots { period, limit } => {
            print_json(&service.snapshots(period.kind(), limit).await)
        }
        Commands::Health => {
            let health = service.health().await;
            print_json(&health)?;
            if !health.is_healthy() {
                bail!("store unavailable");
            }
            Ok(())
        }
    }
}
