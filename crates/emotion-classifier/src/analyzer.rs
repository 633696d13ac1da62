//! Dashboard-category analysis: the AI adapter first, the weighted pattern scorer when the model
//! is unavailable.

use pattern_scorer::{EmotionScores, PatternScorer};
use sentinel_core::{normalize, SentimentCategory};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classifier::{ClassifierError, EmotionClassifier, AI_CONFIDENCE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    Ai,
    PatternMatching,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub sentiment: SentimentCategory,
    pub confidence: f64,
    pub reasoning: String,
    pub method: AnalysisMethod,
    /// Model label before normalization (AI path only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_label: Option<String>,
    /// Per-category scores (pattern path only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<EmotionScores>,
}

#[derive(Clone)]
pub struct SentimentAnalyzer {
    classifier: EmotionClassifier,
    scorer: PatternScorer,
}

impl SentimentAnalyzer {
    pub fn new(classifier: EmotionClassifier, scorer: PatternScorer) -> Self {
        Self { classifier, scorer }
    }

    pub fn classifier(&self) -> &EmotionClassifier {
        &self.classifier
    }

    pub fn scorer(&self) -> &PatternScorer {
        &self.scorer
    }

    /// Dashboard category for `text`.
    pub async fn analyze(&self, text: &str) -> SentimentCategory {
        self.analyze_detailed(text).await.sentiment
    }

    pub async fn analyze_detailed(&self, text: &str) -> DetailedAnalysis {
        if text.trim().is_empty() {
            return self.pattern_analysis(text);
        }

        match self.classifier.try_classify(text).await {
            Ok(label) => DetailedAnalysis {
                sentiment: normalize(&label),
                confidence: AI_CONFIDENCE,
                reasoning: format!("AI classified as: {}", label),
                method: AnalysisMethod::Ai,
                raw_label: Some(label),
                scores: None,
            },
            Err(ClassifierError::Offline) => self.pattern_analysis(text),
            Err(e) => {
                warn!(error = %e, "AI analysis failed, falling back to pattern matching");
                self.pattern_analysis(text)
            }
        }
    }

    fn pattern_analysis(&self, text: &str) -> DetailedAnalysis {
        let analysis = self.scorer.analyze(text);
        DetailedAnalysis {
            sentiment: analysis.sentiment,
            confidence: analysis.confidence,
            reasoning: analysis.reasoning,
            method: AnalysisMethod::PatternMatching,
            raw_label: None,
            scores: Some(analysis.scores),
        }
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new(EmotionClassifier::offline(), PatternScorer::default())
    }
}
