//! Insight generation for replied conversations.
//!
//! An ordered rule table, evaluated first-match-wins, maps reply sentiment
//! plus keyword hits to a fully resolved insight sentence. Rules are data so
//! the decision order is explicit and testable.

use crate::types::{Conversation, Prospect, Sentiment};

const HIGH_INTENT_TMPL: &str =
    "Strong buying signal detected. {reason}. Recommended action: {action}.";
const MEDIUM_INTENT_TMPL: &str = "Moderate interest shown. {reason}. Consider: {action}.";
const OBJECTION_TMPL: &str =
    "Objection identified: {objection_type}. Suggested response: {response}.";
const READY_TO_CLOSE_TMPL: &str =
    "Multiple positive signals. Timeline mentioned. High confidence close opportunity.";
const NEEDS_NURTURING_TMPL: &str = "Early stage. Requires educational content before sales push.";

/// Which template a rule renders, with its slot values baked in.
enum Render {
    HighIntent {
        reason: &'static str,
        action: &'static str,
    },
    MediumIntent {
        reason: &'static str,
        action: &'static str,
    },
    Objection {
        objection_type: &'static str,
        response: &'static str,
    },
    ReadyToClose,
    NeedsNurturing,
}

struct InsightRule {
    /// Required sentiment; `None` matches any sentiment.
    sentiment: Option<Sentiment>,
    /// Any-of keyword hits in the lower-cased reply; empty means no keyword
    /// requirement.
    keywords: &'static [&'static str],
    render: Render,
}

/// Evaluated in order; the final rule has no conditions and always matches.
const RULES: &[InsightRule] = &[
    InsightRule {
        sentiment: Some(Sentiment::Positive),
        keywords: &["schedule", "meeting", "call"],
        render: Render::HighIntent {
            reason: "Prospect requested meeting/call",
            action: "Send calendar invite with 2-3 time options",
        },
    },
    InsightRule {
        sentiment: Some(Sentiment::Positive),
        keywords: &["proposal", "pricing", "quote"],
        render: Render::HighIntent {
            reason: "Prospect asked for pricing/proposal",
            action: "Prepare detailed proposal highlighting ROI",
        },
    },
    InsightRule {
        sentiment: Some(Sentiment::Positive),
        keywords: &["interested", "sounds good"],
        render: Render::MediumIntent {
            reason: "Positive interest expressed",
            action: "Send case study and offer demo",
        },
    },
    InsightRule {
        sentiment: None,
        keywords: &["expensive", "budget", "cost"],
        render: Render::Objection {
            objection_type: "Budget concern",
            response: "Offer pilot program or phased approach with clear ROI metrics",
        },
    },
    InsightRule {
        sentiment: None,
        keywords: &["busy", "timing", "later"],
        render: Render::Objection {
            objection_type: "Timing concern",
            response: "Respect timeline, offer to reconnect in specific timeframe",
        },
    },
    InsightRule {
        sentiment: Some(Sentiment::Positive),
        keywords: &["team", "next steps", "contract"],
        render: Render::ReadyToClose,
    },
    InsightRule {
        sentiment: Some(Sentiment::Neutral),
        keywords: &[],
        render: Render::MediumIntent {
            reason: "Prospect seeking more information",
            action: "Provide detailed resources and schedule follow-up",
        },
    },
    InsightRule {
        sentiment: None,
        keywords: &[],
        render: Render::NeedsNurturing,
    },
];

impl InsightRule {
    fn matches(&self, sentiment: Option<Sentiment>, reply: &str) -> bool {
        if let Some(required) = self.sentiment {
            if sentiment != Some(required) {
                return false;
            }
        }
        self.keywords.is_empty() || self.keywords.iter().any(|k| reply.contains(k))
    }

    fn render(&self) -> String {
        match self.render {
            Render::HighIntent { reason, action } => HIGH_INTENT_TMPL
                .replace("{reason}", reason)
                .replace("{action}", action),
            Render::MediumIntent { reason, action } => MEDIUM_INTENT_TMPL
                .replace("{reason}", reason)
                .replace("{action}", action),
            Render::Objection {
                objection_type,
                response,
            } => OBJECTION_TMPL
                .replace("{objection_type}", objection_type)
                .replace("{response}", response),
            Render::ReadyToClose => READY_TO_CLOSE_TMPL.to_string(),
            Render::NeedsNurturing => NEEDS_NURTURING_TMPL.to_string(),
        }
    }
}

/// Generate a natural-language insight for a replied conversation.
///
/// Pure function of the conversation's sentiment and reply text; the same
/// inputs always produce the same sentence, with every placeholder resolved.
pub fn generate_insight(_prospect: &Prospect, conversation: &Conversation) -> String {
    let reply = conversation
        .reply_message
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.matches(conversation.sentiment, &reply))
        .map(|rule| rule.render())
        .unwrap_or_else(|| NEEDS_NURTURING_TMPL.to_string())
}
