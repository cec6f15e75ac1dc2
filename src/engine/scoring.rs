//! Engagement scoring over a prospect's conversation history and stage.
//!
//! Pure function: base score, additive reply/sentiment terms, a per-status
//! delta, and a recency penalty, clamped to [0, 10]. Nothing is persisted or
//! cached; callers recompute on demand.

use chrono::{DateTime, Utc};

use crate::types::{Prospect, ProspectStatus, Sentiment};
use crate::util::days_between_iso;

const BASE_SCORE: f64 = 5.0;
const REPLY_BONUS: f64 = 0.5;
const POSITIVE_BONUS: f64 = 1.0;
const NEGATIVE_PENALTY: f64 = 1.0;
const STALE_14D_PENALTY: f64 = 1.0;
const STALE_30D_PENALTY: f64 = 2.0;

fn status_delta(status: ProspectStatus) -> f64 {
    match status {
        ProspectStatus::NotContacted => 0.0,
        ProspectStatus::Contacted => 0.5,
        ProspectStatus::Replied => 1.0,
        ProspectStatus::MeetingScheduled => 2.0,
        ProspectStatus::ProposalSent => 2.5,
        ProspectStatus::Negotiating => 3.0,
        ProspectStatus::ClosedWon => 5.0,
        ProspectStatus::ClosedLost => -5.0,
    }
}

/// Score engagement at a fixed point in time. The recency penalty stacks:
/// −1 past 14 days, a further −2 past 30 days. A prospect with no
/// conversations at all is treated as maximally stale.
pub fn score_engagement_at(prospect: &Prospect, now: DateTime<Utc>) -> f64 {
    let mut score = BASE_SCORE;

    let replied = prospect.conversations.iter().filter(|c| c.replied).count();
    score += replied as f64 * REPLY_BONUS;

    let positive = prospect
        .conversations
        .iter()
        .filter(|c| c.sentiment == Some(Sentiment::Positive))
        .count();
    score += positive as f64 * POSITIVE_BONUS;

    score += status_delta(prospect.status);

    let negative = prospect
        .conversations
        .iter()
        .filter(|c| c.sentiment == Some(Sentiment::Negative))
        .count();
    score -= negative as f64 * NEGATIVE_PENALTY;

    // Infinite gap when there is no conversation or its date is unparseable
    let days_stale = prospect
        .last_conversation()
        .and_then(|c| days_between_iso(&c.date, now))
        .unwrap_or(i64::MAX);
    if days_stale > 14 {
        score -= STALE_14D_PENALTY;
    }
    if days_stale > 30 {
        score -= STALE_30D_PENALTY;
    }

    score.clamp(0.0, 10.0)
}

/// Score engagement against the current wall clock.
pub fn score_engagement(prospect: &Prospect) -> f64 {
    score_engagement_at(prospect, Utc::now())
}
