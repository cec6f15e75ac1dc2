//! Keyword-table sentiment classifier for reply text.
//!
//! Deterministic, no external state: lower-case the input, count which
//! keywords from each table appear (presence check, at most 1 per keyword),
//! then apply a fixed decision order.

use crate::types::Sentiment;

const POSITIVE_KEYWORDS: &[&str] = &[
    "interested",
    "sounds good",
    "great",
    "excellent",
    "perfect",
    "definitely",
    "yes",
    "love",
    "excited",
    "looking forward",
    "impressive",
    "thanks",
    "appreciate",
    "helpful",
    "valuable",
    "exactly",
    "absolutely",
    "let's",
    "schedule",
    "meeting",
    "call",
    "demo",
    "proposal",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "not interested",
    "no thanks",
    "too expensive",
    "can't afford",
    "not now",
    "busy",
    "later",
    "unsubscribe",
    "remove",
    "stop",
    "never",
    "wrong",
    "disappointed",
    "concern",
    "issue",
    "problem",
    "difficult",
    "complicated",
];

const NEUTRAL_KEYWORDS: &[&str] = &[
    "maybe",
    "perhaps",
    "possibly",
    "thinking",
    "considering",
    "reviewing",
    "discuss",
    "more info",
    "details",
    "clarify",
    "explain",
    "understand",
];

fn presence_count(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| haystack.contains(**k)).count()
}

/// Classify the emotional tone of a reply.
///
/// Decision order matters: positive wins only when it beats both other
/// counts; a tie between positive and negative reads as neutral; no signal
/// at all is unknown.
pub fn classify_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();

    let positive = presence_count(&lower, POSITIVE_KEYWORDS);
    let negative = presence_count(&lower, NEGATIVE_KEYWORDS);
    let neutral = presence_count(&lower, NEUTRAL_KEYWORDS);

    if positive > negative && positive > neutral {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else if neutral > 0 || (positive > 0 && positive == negative) {
        Sentiment::Neutral
    } else {
        Sentiment::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_reply() {
        assert_eq!(
            classify_sentiment("This sounds great, let's schedule a call"),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_negative_reply() {
        assert_eq!(
            classify_sentiment("Not interested, please remove me from your list"),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_neutral_reply() {
        assert_eq!(
            classify_sentiment("Maybe, we are still reviewing the details"),
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_case_invariance() {
        let samples = [
            "This Sounds GREAT, let's SCHEDULE a call",
            "NOT INTERESTED, no thanks",
            "maybe, PERHAPS later this quarter",
        ];
        for s in samples {
            assert_eq!(classify_sentiment(s), classify_sentiment(&s.to_lowercase()));
            assert_eq!(classify_sentiment(s), classify_sentiment(&s.to_uppercase()));
        }
    }

    #[test]
    fn test_empty_input_is_unknown() {
        assert_eq!(classify_sentiment(""), Sentiment::Unknown);
        // A positive/negative tie at zero falls into the neutral branch only
        // when a neutral keyword fired; whitespace has no signal at all.
        assert_eq!(classify_sentiment("   \n\t"), Sentiment::Unknown);
    }

    #[test]
    fn test_no_keyword_text_is_unknown() {
        assert_eq!(classify_sentiment("qwerty asdf zxcv"), Sentiment::Unknown);
    }

    #[test]
    fn test_positive_negative_tie_is_neutral() {
        // "busy" (negative) and "thanks" (positive) tie at 1 each
        assert_eq!(classify_sentiment("thanks but busy"), Sentiment::Neutral);
    }

    #[test]
    fn test_keyword_counts_presence_not_frequency() {
        // "busy busy busy" still counts negative once; one positive plus one
        // neutral keyword beat it in the ordered decision
        assert_eq!(
            classify_sentiment("busy busy busy but thanks, maybe explain more"),
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_always_one_of_four_values() {
        for text in ["", "great", "problem", "maybe", "unrelated words here"] {
            let s = classify_sentiment(text);
            assert!(matches!(
                s,
                Sentiment::Positive | Sentiment::Neutral | Sentiment::Negative | Sentiment::Unknown
            ));
        }
    }
}
