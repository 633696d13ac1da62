//! # pattern-scorer
//!
//! Rule-based emotion classification with no I/O:
//!
//! - [`PatternScorer`] – weighted regex tiers per category plus context modifiers; exposes raw
//!   scores, the dominant category and a detailed analysis with confidence and reasoning.
//! - [`classify_by_keywords`] – plain keyword counting, the last-resort fallback of the AI adapter.
//!
//! Pattern tables are immutable configuration; a scorer is built once and shared.

mod keywords;
mod rules;
mod scorer;


pub use keywords::{classify_by_keywords, keyword_counts, KeywordCounts};
pub use rules::{RuleSpec, ScorerConfig, Tier};
pub use scorer::{EmotionScores, PatternAnalysis, PatternScorer, ScorerError};
