//! # emotion-classifier
//!
//! Adapter around an external generative model that answers with one emotion word.
//!
//! - [`CompletionBackend`] – the single network seam; [`OpenAIBackend`] implements it over
//!   `openai-client`, tests implement it in-process.
//! - [`EmotionClassifier`] – builds the constrained prompt, applies the timeout, parses the reply and
//!   falls back to the keyword classifier. `classify` never returns an error.
//! - [`SentimentAnalyzer`] – AI first, weighted pattern scorer second; produces dashboard categories
//!   and detailed reasoning.
//! - [`ClassifierConfig`] – environment-driven model/endpoint/timeout settings.

mod analyzer;
mod backend;
mod classifier;
mod config;
mod prompt;

pub use analyzer::{AnalysisMethod, DetailedAnalysis, SentimentAnalyzer};
pub use backend::{CompletionBackend, OpenAIBackend};
pub use classifier::{
    select_label, Classification, ClassificationMethod, ClassifierError, EmotionClassifier,
    AI_CONFIDENCE, KEYWORD_CONFIDENCE,
};
pub use config::ClassifierConfig;
pub use prompt::{build_prompt, parse_response, AI_VOCABULARY, PROMPT_LABELS};
