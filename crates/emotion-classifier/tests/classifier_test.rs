//! Integration tests for [`emotion_classifier::EmotionClassifier`] and
//! [`emotion_classifier::SentimentAnalyzer`].
//!
//! Uses in-process [`CompletionBackend`] mocks (fixed reply, failing, hanging); the last test points
//! the OpenAI backend at a closed local port. No test needs network access or an API key.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use emotion_classifier::{
    select_label, AnalysisMethod, ClassificationMethod, ClassifierError, CompletionBackend,
    EmotionClassifier, OpenAIBackend, SentimentAnalyzer, AI_CONFIDENCE, KEYWORD_CONFIDENCE,
};
use openai_client::OpenAIClient;
use pattern_scorer::PatternScorer;
use sentinel_core::SentimentCategory;

/// Replies with a fixed string and counts calls.
struct FixedBackend {
    reply: String,
    calls: AtomicUsize,
}

impl FixedBackend {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CompletionBackend for FixedBackend {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "fixed"
    }
}

/// Simulates quota/auth/transport failures.
struct FailingBackend;

#[async_trait]
impl CompletionBackend for FailingBackend {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        anyhow::bail!("429 insufficient_quota")
    }

    fn model(&self) -> &str {
        "failing"
    }
}

/// Never answers within any reasonable timeout.
struct HangingBackend;

#[async_trait]
impl CompletionBackend for HangingBackend {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("happy".to_string())
    }

    fn model(&self) -> &str {
        "hanging"
    }
}

fn classifier(backend: Arc<dyn CompletionBackend>) -> EmotionClassifier {
    EmotionClassifier::new(backend, Duration::from_millis(200))
}

/// **Test: A well-formed model reply is used as the label.**
#[tokio::test]
async fn uses_model_reply() {
    let backend = FixedBackend::new("Frustrated");
    let c = classifier(backend.clone());
    let result = c.classify("My order is late again").await;
    assert_eq!(result.label, "frustrated");
    assert_eq!(result.method, ClassificationMethod::Ai);
    assert_eq!(result.confidence, AI_CONFIDENCE);
    assert_eq!(result.model.as_deref(), Some("fixed"));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

/// **Test: A chatty reply is reduced to the first vocabulary word it contains.**
#[tokio::test]
async fn extracts_label_from_chatty_reply() {
    let c = classifier(FixedBackend::new("I'd say the customer sounds confused."));
    assert_eq!(c.classify("What does this charge mean?").await.label, "confused");
}

/// **Test: A reply outside the vocabulary yields neutral, not the fallback.**
#[tokio::test]
async fn unknown_reply_is_neutral() {
    let c = classifier(FixedBackend::new("wistful"));
    let result = c.classify("I hate this, it is useless").await;
    assert_eq!(result.label, "neutral");
    assert_eq!(result.method, ClassificationMethod::Ai);
}

/// **Test: Transport failure falls back to the keyword classifier instead of erroring.**
#[tokio::test]
async fn transport_failure_uses_keyword_fallback() {
    let c = classifier(Arc::new(FailingBackend));
    let result = c.classify("This is unacceptable, I'm furious").await;
    assert_eq!(result.label, "angry");
    assert_eq!(result.method, ClassificationMethod::KeywordFallback);
    assert_eq!(result.confidence, KEYWORD_CONFIDENCE);
    assert_eq!(result.model, None);
}

/// **Test: A hanging model is cut off by the timeout and treated as a failure.**
#[tokio::test]
async fn timeout_uses_keyword_fallback() {
    let c = classifier(Arc::new(HangingBackend));
    assert!(matches!(
        c.try_classify("thank you").await,
        Err(ClassifierError::Timeout(_))
    ));
    let result = c.classify("thank you so much").await;
    assert_eq!(result.label, "happy");
    assert_eq!(result.method, ClassificationMethod::KeywordFallback);
}

/// **Test: Empty replies count as malformed and fall back.**
#[tokio::test]
async fn empty_reply_uses_fallback() {
    let c = classifier(FixedBackend::new("   "));
    let result = c.classify("I'm not sure how to clarify this").await;
    assert_eq!(result.label, "confused");
    assert_eq!(result.method, ClassificationMethod::KeywordFallback);
}

/// **Test: Blank text never reaches the model and is neutral.**
#[tokio::test]
async fn blank_text_skips_model() {
    let backend = FixedBackend::new("angry");
    let c = classifier(backend.clone());
    let result = c.classify("   ").await;
    assert_eq!(result.label, "neutral");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

/// **Test: Offline classifier always answers from the keyword lists.**
#[tokio::test]
async fn offline_classifier_falls_back() {
    let c = EmotionClassifier::offline();
    assert!(!c.is_online());
    let result = c.classify("Excellent support, thank you").await;
    assert_eq!(result.label, "happy");
    assert_eq!(result.method, ClassificationMethod::KeywordFallback);
}

/// **Test: Fallback selection is a pure function of the outcome and the text.**
#[test]
fn select_label_prefers_ai_outcome() {
    let ok = select_label(Ok("grateful".to_string()), "I hate it");
    assert_eq!(ok.label, "grateful");
    let err = select_label(Err(ClassifierError::Transport("boom".into())), "I hate it");
    assert_eq!(err.label, "angry");
    assert_eq!(err.method, ClassificationMethod::KeywordFallback);
}

/// **Test: Analyzer maps AI labels to categories with fixed confidence.**
#[tokio::test]
async fn analyzer_uses_ai_when_available() {
    let analyzer = SentimentAnalyzer::new(
        classifier(FixedBackend::new("thrilled")),
        PatternScorer::default(),
    );
    let detail = analyzer.analyze_detailed("whatever").await;
    assert_eq!(detail.sentiment, SentimentCategory::Joy);
    assert_eq!(detail.method, AnalysisMethod::Ai);
    assert_eq!(detail.confidence, 0.9);
    assert_eq!(detail.raw_label.as_deref(), Some("thrilled"));
    assert!(detail.scores.is_none());
}

/// **Test: Analyzer falls back to the weighted pattern scorer on AI failure.**
#[tokio::test]
async fn analyzer_falls_back_to_patterns() {
    let analyzer = SentimentAnalyzer::new(classifier(Arc::new(FailingBackend)), PatternScorer::default());
    let detail = analyzer
        .analyze_detailed("I am absolutely furious with this service!")
        .await;
    assert_eq!(detail.sentiment, SentimentCategory::Anger);
    assert_eq!(detail.method, AnalysisMethod::PatternMatching);
    assert!(detail.scores.is_some());
    assert!(detail.reasoning.starts_with("Pattern matching detected anger"));
}

/// **Test: Unreachable OpenAI endpoint degrades to the keyword fallback.**
#[tokio::test]
async fn unreachable_openai_endpoint_falls_back() {
    let client = OpenAIClient::with_base_url(
        "sk-test-not-a-real-key-0000".to_string(),
        "http://127.0.0.1:9/v1".to_string(),
    );
    let backend = OpenAIBackend::new(client, "gpt-4o-mini");
    let c = EmotionClassifier::new(Arc::new(backend), Duration::from_secs(2));
    let result = c.classify("I'm confused about my bill").await;
    assert_eq!(result.method, ClassificationMethod::KeywordFallback);
    assert_eq!(result.label, "confused");
}
