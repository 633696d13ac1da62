//! AI classification with explicit outcomes.
//!
//! [`EmotionClassifier::try_classify`] returns `Ok(label)` or a [`ClassifierError`];
//! [`select_label`] turns that outcome into a [`Classification`], substituting the keyword
//! classifier on failure. [`EmotionClassifier::classify`] composes the two and cannot fail.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pattern_scorer::classify_by_keywords;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::backend::{CompletionBackend, OpenAIBackend};
use crate::config::ClassifierConfig;
use crate::prompt::{build_prompt, parse_response};

/// Confidence reported for model answers, which carry no score of their own.
pub const AI_CONFIDENCE: f64 = 0.9;
/// Confidence reported for keyword-count fallback labels.
pub const KEYWORD_CONFIDENCE: f64 = 0.5;

/// Why the AI path produced no label. Always recovered locally.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classification unavailable: no model backend configured")]
    Offline,
    #[error("Classification unavailable: {0}")]
    Transport(String),
    #[error("Classification unavailable: no reply within {0:?}")]
    Timeout(Duration),
    #[error("Classification unavailable: empty reply")]
    EmptyResponse,
    #[error("Classification skipped: blank input")]
    BlankInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    Ai,
    KeywordFallback,
}

impl ClassificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::Ai => "ai",
            ClassificationMethod::KeywordFallback => "keyword_fallback",
        }
    }
}

/// A raw label and how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub method: ClassificationMethod,
    pub confidence: f64,
    /// Model that produced the label; `None` for the keyword fallback.
    pub model: Option<String>,
    pub elapsed_ms: u64,
}

/// Fallback selection: the AI label when present, otherwise the keyword classifier's label.
pub fn select_label(outcome: Result<String, ClassifierError>, text: &str) -> Classification {
    match outcome {
        Ok(label) => Classification {
            label,
            method: ClassificationMethod::Ai,
            confidence: AI_CONFIDENCE,
            model: None,
            elapsed_ms: 0,
        },
        Err(e) => {
            let label = classify_by_keywords(text);
            if !matches!(e, ClassifierError::Offline | ClassifierError::BlankInput) {
                warn!(error = %e, fallback = label, "AI classification failed, using keyword fallback");
            }
            Classification {
                label: label.to_string(),
                method: ClassificationMethod::KeywordFallback,
                confidence: KEYWORD_CONFIDENCE,
                model: None,
                elapsed_ms: 0,
            }
        }
    }
}

/// AI emotion classifier. Holds no per-request state; clone freely.
#[derive(Clone)]
pub struct EmotionClassifier {
    backend: Option<Arc<dyn CompletionBackend>>,
    timeout: Duration,
}

impl EmotionClassifier {
    pub fn new(backend: Arc<dyn CompletionBackend>, timeout: Duration) -> Self {
        Self {
            backend: Some(backend),
            timeout,
        }
    }

    /// Classifier without a model; every call uses the keyword fallback.
    pub fn offline() -> Self {
        Self {
            backend: None,
            timeout: Duration::from_secs(0),
        }
    }

    /// OpenAI-backed when an API key is configured, offline otherwise.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        match OpenAIBackend::from_config(config) {
            Some(backend) => {
                info!(model = %config.model, base_url = %config.base_url, "AI classifier enabled");
                Self::new(Arc::new(backend), config.timeout)
            }
            None => {
                info!("OPENAI_API_KEY not set; AI classifier offline, keyword fallback only");
                Self::offline()
            }
        }
    }

    pub fn is_online(&self) -> bool {
        self.backend.is_some()
    }

    /// Model identifier of the backend, if any.
    pub fn model(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.model())
    }

    /// One bounded model call; no retries.
    pub async fn try_classify(&self, text: &str) -> Result<String, ClassifierError> {
        let backend = self.backend.as_ref().ok_or(ClassifierError::Offline)?;
        let prompt = build_prompt(text);

        let reply = tokio::time::timeout(self.timeout, backend.complete(&prompt))
            .await
            .map_err(|_| ClassifierError::Timeout(self.timeout))?
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        if reply.trim().is_empty() {
            return Err(ClassifierError::EmptyResponse);
        }

        let label = parse_response(&reply);
        info!(raw = %reply.trim(), label, "AI classification");
        Ok(label.to_string())
    }

    /// Raw label for `text`. Never fails: worst case is the keyword fallback's `neutral`.
    pub async fn classify(&self, text: &str) -> Classification {
        let started = Instant::now();
        let outcome = if text.trim().is_empty() {
            Err(ClassifierError::BlankInput)
        } else {
            self.try_classify(text).await
        };
        let mut classification = select_label(outcome, text);
        if classification.method == ClassificationMethod::Ai {
            classification.model = self.model().map(str::to_string);
        }
        classification.elapsed_ms = started.elapsed().as_millis() as u64;
        classification
    }
}

impl Default for EmotionClassifier {
    fn default() -> Self {
        Self::offline()
    }
}
