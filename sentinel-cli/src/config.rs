//! Process configuration from the environment.

use anyhow::{Context, Result};
use emotion_classifier::ClassifierConfig;
use std::env;

const DEFAULT_DATABASE_URL: &str = "./sentiment_sentinel.db";
const DEFAULT_LOG_FILE: &str = "logs/sentinel.log";

#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// DATABASE_URL: SQLite file path or `sqlite:` URL.
    pub database_url: String,
    /// LOG_FILE
    pub log_file: String,
    pub classifier: ClassifierConfig,
}

impl SentinelConfig {
    /// Load from environment variables. `database_url` overrides DATABASE_URL.
    pub fn from_env(database_url: Option<String>) -> Result<Self> {
        let database_url = database_url
            .or_else(|| env::var("DATABASE_URL").ok())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let classifier = ClassifierConfig::from_env().context("Load classifier config")?;

        Ok(Self {
            database_url,
            log_file,
            classifier,
        })
    }
}
