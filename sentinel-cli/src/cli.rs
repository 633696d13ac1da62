//! CLI parser.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sentinel")]
#[command(about = "Customer message sentiment: ingest, classify, dashboard queries", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database (overrides DATABASE_URL).
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store one message (flags) or a batch (JSON file: object or array).
    Ingest {
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, default_value = "chat")]
        source: String,
        #[arg(long, default_value = "cli")]
        sender: String,
        /// Defaults to now.
        #[arg(long)]
        timestamp: Option<String>,
        #[arg(long)]
        sentiment: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Raw label from the AI classifier (keyword fallback when unavailable).
    Classify { text: String },
    /// Dashboard category with confidence and reasoning.
    Analyze { text: String },
    /// Category counts and percentages.
    Overview {
        #[arg(long)]
        user: Option<String>,
    },
    /// Current overview next to the overview of messages older than N hours.
    Compare {
        #[arg(long, default_value_t = analytics::DEFAULT_COMPARISON_HOURS)]
        hours: u32,
        #[arg(long)]
        user: Option<String>,
    },
    /// Hourly category buckets.
    Trends {
        #[arg(long, default_value_t = analytics::DEFAULT_TREND_HOURS)]
        hours: u32,
        #[arg(long)]
        user: Option<String>,
    },
    /// Messages with a negative label, most recent first.
    Negative {
        #[arg(short, long)]
        limit: Option<i64>,
    },
    /// Active alerts, most recent first.
    Alerts {
        #[arg(short, long)]
        limit: Option<i64>,
    },
    /// List stored messages, or show one by id.
    Messages {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        sender: Option<String>,
        #[arg(long)]
        sentiment: Option<String>,
        #[arg(long)]
        user: Option<String>,
        #[arg(short, long, default_value = "50")]
        limit: i64,
        #[arg(long, default_value = "0")]
        offset: i64,
    },
    /// Totals by source and label; `--realtime` for the current hour.
    Stats {
        #[arg(long)]
        realtime: bool,
    },
    /// Classification audit trail.
    History {
        #[arg(long)]
        message_id: Option<String>,
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },
    /// Delete messages, alerts, history and snapshots for one user, or everything.
    Reset {
        #[arg(long)]
        user: Option<String>,
        /// Required: the delete is irreversible.
        #[arg(long)]
        yes: bool,
    },
    /// Label stored messages that have no usable sentiment.
    Backfill,
    /// Compute and store a daily or weekly summary.
    Snapshot {
        #[arg(value_enum)]
        period: Period,
        /// Day inside the period (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },
    /// List stored summaries.
    Snapshots {
        #[arg(value_enum)]
        period: Period,
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },
    /// Store reachability and classifier mode.
    Health,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
}

impl Period {
    pub fn kind(&self) -> &'static str {
        match self {
            Period::Daily => analytics::DAILY_SUMMARY,
            Period::Weekly => analytics::WEEKLY_SUMMARY,
        }
    }
}
