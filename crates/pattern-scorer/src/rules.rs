//! Built-in pattern tables and the config type used to build a [`crate::PatternScorer`].

use sentinel_core::SentimentCategory;

/// Pattern tier; each match contributes the tier's weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn weight(&self) -> f64 {
        match self {
            Tier::High => 3.0,
            Tier::Medium => 2.0,
            Tier::Low => 1.0,
        }
    }
}

/// One pattern in one tier of one scored category.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub category: SentimentCategory,
    pub tier: Tier,
    pub pattern: String,
}

/// Everything a scorer needs. Patterns are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    pub rules: Vec<RuleSpec>,
    /// Each match adds `context_weight` to anger.
    pub negative_context: Vec<String>,
    /// Each match adds `context_weight` to joy.
    pub positive_context: Vec<String>,
    pub context_weight: f64,
}

type TierTable = &'static [(Tier, &'static [&'static str])];

const ANGER: TierTable = &[
    (
        Tier::High,
        &[
            r"\b(angry|furious|livid|enraged|outraged)\b",
            r"\b(hate|loathe|despise|abhor)\b",
            r"\b(terrible|awful|horrible|dreadful|atrocious)\b",
            r"\b(useless|worthless|garbage|trash|rubbish)\b",
            r"\b(fed up|sick of|tired of|had enough)\b",
            r"\b(never|ever again|worst|disaster)\b",
        ],
    ),
    (
        Tier::Medium,
        &[
            r"\b(frustrated|irritated|annoyed|bothered)\b",
            r"\b(disappointed|dissatisfied|unhappy)\b",
            r"\b(problem|issue|bug|error|fail)\b",
            r"\b(slow|delayed|late|waiting)\b",
            r"\b(expensive|costly|overpriced)\b",
            r"\b(complicated|complex|difficult|hard)\b",
        ],
    ),
    (
        Tier::Low,
        &[
            r"\b(not good|not great|not happy)\b",
            r"\b(could be better|room for improvement)\b",
            r"\b(concerned|worried|anxious)\b",
        ],
    ),
];

const JOY: TierTable = &[
    (
        Tier::High,
        &[
            r"\b(excellent|outstanding|amazing|fantastic)\b",
            r"\b(perfect|brilliant|superb|magnificent)\b",
            r"\b(love|adore|cherish|treasure)\b",
            r"\b(thrilled|delighted|ecstatic|overjoyed)\b",
            r"\b(best|greatest|top|number one)\b",
        ],
    ),
    (
        Tier::Medium,
        &[
            r"\b(happy|pleased|satisfied|content)\b",
            r"\b(good|great|nice|wonderful)\b",
            r"\b(thank you|thanks|grateful|appreciate)\b",
            r"\b(working|fixed|resolved|solved)\b",
            r"\b(fast|quick|efficient|smooth)\b",
            r"\b(easy|simple|straightforward)\b",
        ],
    ),
    (
        Tier::Low,
        &[
            r"\b(okay|fine|alright|acceptable)\b",
            r"\b(not bad|decent|reasonable)\b",
            r"\b(progress|improvement|better)\b",
        ],
    ),
];

const CONFUSION: TierTable = &[
    (
        Tier::High,
        &[
            r"\b(completely lost|totally confused|no idea)\b",
            r"\b(doesn't make sense|nonsensical|gibberish)\b",
            r"\b(what is this|what happened|where am i)\b",
        ],
    ),
    (
        Tier::Medium,
        &[
            r"\b(confused|puzzled|bewildered|perplexed)\b",
            r"\b(not sure|uncertain|unclear|vague)\b",
            r"\b(how to|what do i|where do i)\b",
            r"\b(explain|clarify|help me understand)\b",
            r"\b(complicated|complex|difficult)\b",
        ],
    ),
    (
        Tier::Low,
        &[
            r"\b(maybe|perhaps|possibly)\b",
            r"\b(not clear|unclear|vague)\b",
            r"\b(need help|assistance|guidance)\b",
        ],
    ),
];

const NEGATIVE_CONTEXT: &[&str] = &[
    r"\b(still|yet|again|once more)\b",
    r"\b(not working|broken|failed|error)\b",
    r"\b(same|identical|unchanged|no change)\b",
    r"\b(waiting|delayed|late|slow)\b",
    r"\b(expensive|costly|overpriced|high price)\b",
];

const POSITIVE_CONTEXT: &[&str] = &[
    r"\b(now working|fixed|resolved|solved)\b",
    r"\b(improved|better|faster|easier)\b",
    r"\b(quick|fast|efficient|smooth)\b",
    r"\b(affordable|reasonable|good price)\b",
];

impl ScorerConfig {
    /// The shipped customer-support pattern set.
    pub fn builtin() -> Self {
        let tables = [
            (SentimentCategory::Anger, ANGER),
            (SentimentCategory::Joy, JOY),
            (SentimentCategory::Confusion, CONFUSION),
        ];

        let mut rules = Vec::new();
        for (category, table) in tables {
            for (tier, patterns) in table {
                for pattern in patterns.iter() {
                    rules.push(RuleSpec {
                        category,
                        tier: *tier,
                        pattern: pattern.to_string(),
                    });
                }
            }
        }

        Self {
            rules,
            negative_context: NEGATIVE_CONTEXT.iter().map(|p| p.to_string()).collect(),
            positive_context: POSITIVE_CONTEXT.iter().map(|p| p.to_string()).collect(),
            context_weight: 0.5,
        }
    }
}
