//! Keyword-count classifier: the fallback the AI adapter uses when the model is unreachable.
//!
//! Counts how many keywords of each list occur as substrings of the lower-cased text (each keyword
//! at most once) and never fails.

/// (label, keywords)
const KEYWORD_TABLE: &[(&str, &[&str])] = &[
    (
        "angry",
        &[
            "angry",
            "furious",
            "frustrated",
            "hate",
            "terrible",
            "awful",
            "disgusting",
            "unacceptable",
            "outrageous",
            "livid",
            "fed up",
            "disgusted",
            "irritated",
            "garbage",
            "useless",
            "worst",
            "horrible",
            "mad",
            "pissed",
            "annoyed",
        ],
    ),
    (
        "happy",
        &[
            "thank you",
            "grateful",
            "happy",
            "excellent",
            "amazing",
            "wonderful",
            "fantastic",
            "great",
            "love",
            "thrilled",
            "delighted",
            "pleased",
            "satisfied",
            "outstanding",
            "perfect",
            "brilliant",
            "awesome",
        ],
    ),
    (
        "confused",
        &[
            "confused",
            "don't understand",
            "unclear",
            "puzzled",
            "uncertain",
            "not sure",
            "bewildered",
            "help me understand",
            "clarify",
            "explain",
        ],
    ),
];

/// Number of distinct keywords found per list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordCounts {
    pub angry: usize,
    pub happy: usize,
    pub confused: usize,
}

pub fn keyword_counts(text: &str) -> KeywordCounts {
    let lower = text.to_lowercase();
    let count = |label: &str| {
        KEYWORD_TABLE
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, words)| words.iter().filter(|w| lower.contains(*w)).count())
            .unwrap_or(0)
    };
    KeywordCounts {
        angry: count("angry"),
        happy: count("happy"),
        confused: count("confused"),
    }
}

/// Returns `happy`, `angry`, `confused` or `neutral`. Happy wins ties, then angry.
pub fn classify_by_keywords(text: &str) -> &'static str {
    let c = keyword_counts(text);
    tracing::debug!(
        angry = c.angry,
        happy = c.happy,
        confused = c.confused,
        "keyword fallback scores"
    );

    if c.happy > 0 && c.happy >= c.angry && c.happy >= c.confused {
        "happy"
    } else if c.angry > 0 && c.angry >= c.confused {
        "angry"
    } else if c.confused > 0 {
        "confused"
    } else {
        "neutral"
    }
}
