//! Weighted regex scorer.
//!
//! Score per category = Σ (matches × tier weight) over the category's patterns, then context
//! modifiers add `matches × context_weight` to anger (negative context) and joy (positive
//! context). Distinct patterns count independently even when they match the same words.

use once_cell::sync::Lazy;
use regex::Regex;
use sentinel_core::SentimentCategory;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::rules::ScorerConfig;

#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Rule '{0}' targets neutral; only anger, joy and confusion are scored")]
    NeutralRule(String),
}

/// Raw per-category scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionScores {
    pub anger: f64,
    pub joy: f64,
    pub confusion: f64,
}

impl EmotionScores {
    /// Tie-break order for equal maxima.
    const PRIORITY: [SentimentCategory; 3] = [
        SentimentCategory::Anger,
        SentimentCategory::Confusion,
        SentimentCategory::Joy,
    ];

    pub fn get(&self, category: SentimentCategory) -> f64 {
        match category {
            SentimentCategory::Anger => self.anger,
            SentimentCategory::Joy => self.joy,
            SentimentCategory::Confusion => self.confusion,
            SentimentCategory::Neutral => 0.0,
        }
    }

    fn add(&mut self, category: SentimentCategory, amount: f64) {
        match category {
            SentimentCategory::Anger => self.anger += amount,
            SentimentCategory::Joy => self.joy += amount,
            SentimentCategory::Confusion => self.confusion += amount,
            SentimentCategory::Neutral => {}
        }
    }

    pub fn max(&self) -> f64 {
        self.anger.max(self.joy).max(self.confusion)
    }

    pub fn total(&self) -> f64 {
        self.anger + self.joy + self.confusion
    }

    /// Highest-scoring category; neutral when nothing scored. Ties resolve anger > confusion > joy.
    pub fn dominant(&self) -> SentimentCategory {
        let max = self.max();
        if max <= 0.0 {
            return SentimentCategory::Neutral;
        }
        Self::PRIORITY
            .into_iter()
            .find(|c| self.get(*c) == max)
            .unwrap_or(SentimentCategory::Neutral)
    }
}

/// Detailed result of a pattern-only classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub sentiment: SentimentCategory,
    /// max score / sum of scores, 0 when nothing scored; rounded to 3 decimals.
    pub confidence: f64,
    pub reasoning: String,
    pub scores: EmotionScores,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    category: SentimentCategory,
    weight: f64,
    regex: Regex,
}

/// Compiled pattern tables. Cheap to clone; holds no mutable state.
#[derive(Debug, Clone)]
pub struct PatternScorer {
    rules: Vec<CompiledRule>,
    negative_context: Vec<Regex>,
    positive_context: Vec<Regex>,
    context_weight: f64,
}

static BUILTIN: Lazy<PatternScorer> = Lazy::new(|| {
    PatternScorer::new(&ScorerConfig::builtin()).expect("built-in patterns compile")
});

fn compile(pattern: &str) -> Result<Regex, ScorerError> {
    Regex::new(&format!("(?i){}", pattern)).map_err(|source| ScorerError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl PatternScorer {
    pub fn new(config: &ScorerConfig) -> Result<Self, ScorerError> {
        let rules = config
            .rules
            .iter()
            .map(|rule| {
                if rule.category == SentimentCategory::Neutral {
                    return Err(ScorerError::NeutralRule(rule.pattern.clone()));
                }
                Ok(CompiledRule {
                    category: rule.category,
                    weight: rule.tier.weight(),
                    regex: compile(&rule.pattern)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let negative_context = config
            .negative_context
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        let positive_context = config
            .positive_context
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            negative_context,
            positive_context,
            context_weight: config.context_weight,
        })
    }

    /// Scorer over the built-in customer-support tables, compiled once per process.
    pub fn builtin() -> &'static PatternScorer {
        &BUILTIN
    }

    /// Raw scores including context modifiers.
    pub fn score(&self, text: &str) -> EmotionScores {
        let mut scores = EmotionScores::default();

        for rule in &self.rules {
            let matches = rule.regex.find_iter(text).count();
            scores.add(rule.category, matches as f64 * rule.weight);
        }

        let negative: usize = self
            .negative_context
            .iter()
            .map(|r| r.find_iter(text).count())
            .sum();
        let positive: usize = self
            .positive_context
            .iter()
            .map(|r| r.find_iter(text).count())
            .sum();
        scores.anger += negative as f64 * self.context_weight;
        scores.joy += positive as f64 * self.context_weight;

        scores
    }

    /// Dominant category for `text`; neutral for blank input.
    pub fn classify(&self, text: &str) -> SentimentCategory {
        if text.trim().is_empty() {
            return SentimentCategory::Neutral;
        }
        self.score(text).dominant()
    }

    /// Dominant category with confidence, a readable reasoning line and the raw scores.
    pub fn analyze(&self, text: &str) -> PatternAnalysis {
        if text.trim().is_empty() {
            return PatternAnalysis {
                sentiment: SentimentCategory::Neutral,
                confidence: 0.0,
                reasoning: "Empty or invalid text".to_string(),
                scores: EmotionScores::default(),
            };
        }

        let scores = self.score(text);
        let sentiment = scores.dominant();
        let total = scores.total();
        let confidence = if total > 0.0 { scores.max() / total } else { 0.0 };

        let parts: Vec<String> = [
            SentimentCategory::Anger,
            SentimentCategory::Joy,
            SentimentCategory::Confusion,
        ]
        .into_iter()
        .filter(|c| scores.get(*c) > 0.0)
        .map(|c| format!("{}: {:.1}", c, scores.get(c)))
        .collect();

        let reasoning = format!(
            "Pattern matching detected {} (confidence: {:.2}). Scores: {}",
            sentiment,
            confidence,
            parts.join(", ")
        );

        debug!(sentiment = %sentiment, confidence, "pattern analysis");

        PatternAnalysis {
            sentiment,
            confidence: (confidence * 1000.0).round() / 1000.0,
            reasoning,
            scores,
        }
    }
}

impl Default for PatternScorer {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
