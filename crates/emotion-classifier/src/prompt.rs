//! The constrained prompt and the parser for the model's one-word reply.

/// Labels the prompt asks the model to choose from.
pub const PROMPT_LABELS: &[&str] = &[
    "angry",
    "frustrated",
    "happy",
    "grateful",
    "confused",
    "uncertain",
    "neutral",
];

/// Every label the parser accepts, in match order. Includes synonyms models tend to answer with.
pub const AI_VOCABULARY: &[&str] = &[
    "angry",
    "frustrated",
    "happy",
    "grateful",
    "confused",
    "uncertain",
    "neutral",
    "joy",
    "thrilled",
    "delighted",
    "upset",
    "disgusted",
    "irritated",
    "furious",
    "puzzled",
    "bewildered",
];

pub fn build_prompt(text: &str) -> String {
    format!(
        "What is the emotional tone of this customer message? Return only one word from: {}.\n\nMessage:\n{}",
        PROMPT_LABELS.join(", "),
        text
    )
}

/// Exact match first, then the first vocabulary word contained in the reply, else `neutral`.
pub fn parse_response(raw: &str) -> &'static str {
    let reply = raw.trim().to_lowercase();

    AI_VOCABULARY
        .iter()
        .copied()
        .find(|w| *w == reply)
        .or_else(|| AI_VOCABULARY.iter().copied().find(|w| reply.contains(w)))
        .unwrap_or("neutral")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_labels_and_message() {
        let prompt = build_prompt("Where is my refund?");
        assert!(prompt.contains("angry, frustrated, happy, grateful, confused, uncertain, neutral."));
        assert!(prompt.ends_with("Message:\nWhere is my refund?"));
    }

    #[test]
    fn exact_match_after_trim_and_lowercase() {
        assert_eq!(parse_response("  Frustrated\n"), "frustrated");
        assert_eq!(parse_response("BEWILDERED"), "bewildered");
    }

    #[test]
    fn substring_match_uses_vocabulary_order() {
        assert_eq!(parse_response("The tone is: Grateful."), "grateful");
        // "angry" precedes "furious" in the vocabulary.
        assert_eq!(parse_response("furious, angry"), "angry");
    }

    #[test]
    fn unrecognized_reply_is_neutral() {
        assert_eq!(parse_response("melancholic"), "neutral");
        assert_eq!(parse_response(""), "neutral");
    }
}
