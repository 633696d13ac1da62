//! Classifier configuration loaded from the environment.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Model endpoint and call budget for the AI adapter.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// OPENAI_API_KEY; when unset the classifier runs offline and always falls back.
    pub api_key: Option<String>,
    /// OPENAI_BASE_URL
    pub base_url: String,
    /// EMOTION_MODEL or MODEL
    pub model: String,
    /// CLASSIFIER_TIMEOUT_SECS
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl ClassifierConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let base_url = env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url);
        let model = env::var("EMOTION_MODEL")
            .or_else(|_| env::var("MODEL"))
            .unwrap_or(defaults.model);
        let timeout = match env::var("CLASSIFIER_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("CLASSIFIER_TIMEOUT_SECS is not a number: {}", raw))?,
            ),
            Err(_) => defaults.timeout,
        };
        Ok(Self {
            api_key,
            base_url,
            model,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for key in [
            "OPENAI_API_KEY",
            "OPENAI_BASE_URL",
            "EMOTION_MODEL",
            "MODEL",
            "CLASSIFIER_TIMEOUT_SECS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_env() {
        clear();
        let config = ClassifierConfig::from_env().unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn reads_overrides() {
        clear();
        env::set_var("OPENAI_API_KEY", "sk-test-key-123456");
        env::set_var("MODEL", "gemini-1.5-flash");
        env::set_var("CLASSIFIER_TIMEOUT_SECS", "3");
        let config = ClassifierConfig::from_env().unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test-key-123456"));
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.timeout, Duration::from_secs(3));
        clear();
    }

    #[test]
    #[serial]
    fn rejects_bad_timeout() {
        clear();
        env::set_var("CLASSIFIER_TIMEOUT_SECS", "soon");
        assert!(ClassifierConfig::from_env().is_err());
        clear();
    }
}
