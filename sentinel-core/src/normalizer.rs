//! Maps the open raw-label vocabulary onto the four dashboard categories.

use crate::types::SentimentCategory;

/// Raw labels per category. Canonical names map to themselves so already-normalized labels
/// (as written by the pattern scorer) stay stable.
const CATEGORY_TABLE: &[(SentimentCategory, &[&str])] = &[
    (
        SentimentCategory::Anger,
        &[
            "anger",
            "angry",
            "frustrated",
            "furious",
            "irritated",
            "disgusted",
            "upset",
            "livid",
            "mad",
        ],
    ),
    (
        SentimentCategory::Joy,
        &[
            "joy",
            "happy",
            "grateful",
            "thrilled",
            "delighted",
            "pleased",
            "satisfied",
            "excellent",
            "amazing",
            "wonderful",
            "fantastic",
            "great",
            "outstanding",
        ],
    ),
    (
        SentimentCategory::Confusion,
        &[
            "confusion",
            "confused",
            "uncertain",
            "puzzled",
            "bewildered",
            "unclear",
        ],
    ),
    (
        SentimentCategory::Neutral,
        &["neutral", "unknown", "informational"],
    ),
];

/// Normalizes a raw label (case-insensitive). Total: anything unmatched is [`SentimentCategory::Neutral`].
pub fn normalize(label: &str) -> SentimentCategory {
    let key = label.trim().to_lowercase();
    CATEGORY_TABLE
        .iter()
        .find(|(_, labels)| labels.contains(&key.as_str()))
        .map(|(category, _)| *category)
        .unwrap_or(SentimentCategory::Neutral)
}
