//! Deterministic rule engine: sentiment, insights, scoring, next actions,
//! and follow-up drafting. Everything here is pure or RNG-injected; the
//! record store is the only stateful layer.

pub mod followup;
pub mod insight;
pub mod next_action;
pub mod scoring;
pub mod sentiment;

pub use followup::{
    batch_compose, compose_contextual_follow_up, compose_follow_up, infer_context,
    infer_context_at, FollowUpContext,
};
pub use insight::generate_insight;
pub use next_action::{suggest_next_action, suggest_next_action_at};
pub use scoring::{score_engagement, score_engagement_at};
pub use sentiment::classify_sentiment;
