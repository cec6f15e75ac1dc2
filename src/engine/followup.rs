//! Template-based follow-up drafting.
//!
//! Each context maps to a small fixed bank of templates; one is picked
//! uniformly at random through an injected RNG (seedable in tests) and its
//! placeholders are filled from prospect fields plus fixed filler values.
//! Composition simulates drafting latency with a single sleep — no
//! cancellation, no side effects beyond the returned string.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::types::{Prospect, ProspectStatus, Sentiment};
use crate::util::{days_between_iso, first_name};

/// Simulated drafting latency.
const DRAFT_LATENCY_MS: u64 = 400;

/// Situation a follow-up draft is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpContext {
    NoReplyFirst,
    NoReplySecond,
    PositiveResponse,
    BudgetObjection,
    TimingObjection,
    PostMeeting,
    ProposalSent,
}

fn templates_for(context: FollowUpContext) -> &'static [&'static str] {
    match context {
        FollowUpContext::NoReplyFirst => &[
            "Hi {name}, just bumping this up in case it got buried in your inbox. Would love to hear your thoughts on how we could help {company} with {pain_point}.",
            "{name}, wanted to circle back on my previous message about {solution}. Is this something that might be relevant for {company} right now?",
            "Hi {name}, following up on my last note. I know you're busy - would a quick 15-min call next week work to discuss {topic}?",
        ],
        FollowUpContext::NoReplySecond => &[
            "{name}, I know inboxes get crazy. Just wanted to check if you had a chance to review my previous messages about {solution}?",
            "Hi {name}, last follow-up from me! If the timing isn't right, totally understand. Just wanted to leave you with a case study from {industry}: {result}.",
            "{name}, realized we might have caught you at a busy time. Would {alternative_time} work better for a brief chat?",
        ],
        FollowUpContext::PositiveResponse => &[
            "That's great to hear, {name}! I've attached a case study from a similar {industry} company that saw {result}. When would be a good time for a deeper dive?",
            "Thanks {name}! Based on what you mentioned about {pain_point}, I think you'd find our approach to {solution} really valuable. Can I send over a quick demo video?",
            "Excellent! Let me send you some concrete examples of how we've helped companies like {company} with {specific_challenge}. Are you free for a 20-min call next week?",
        ],
        FollowUpContext::BudgetObjection => &[
            "I totally understand budget constraints, {name}. What if we started with a pilot program focusing just on {specific_area}? That would give you proof of concept before a larger investment.",
            "That makes sense, {name}. Many of our clients started with our basic tier at {lower_price} to prove ROI first. Would that work for your situation?",
            "{name}, appreciate the honesty. Could we explore a phased approach where you pay based on achieved results? We're confident enough to offer that.",
        ],
        FollowUpContext::TimingObjection => &[
            "Completely understand, {name}. When would be a better time to reconnect? I'll put a reminder to follow up in {timeframe}.",
            "No problem at all, {name}. Would Q{next_quarter} be a better time? I'll send over some resources in the meantime that you can review at your leisure.",
            "I get it, {name}. How about I just send you a brief case study now, and we can reconnect when things settle down? No pressure.",
        ],
        FollowUpContext::PostMeeting => &[
            "Thanks for your time today, {name}! As discussed, I've attached {deliverable}. Looking forward to hearing your team's thoughts.",
            "Great conversation, {name}! I've put together a summary of our discussion and next steps. Can you confirm if {date} works for our follow-up call?",
            "{name}, really enjoyed our chat. Based on your feedback about {topic}, I've tailored this proposal specifically for {company}. Let me know what you think!",
        ],
        FollowUpContext::ProposalSent => &[
            "Hi {name}, wanted to check if you had a chance to review the proposal I sent over? Happy to walk through any sections that need clarification.",
            "{name}, following up on the proposal. I know your team mentioned {concern} - I've added an addendum addressing that specifically. Available for a call anytime.",
            "Hi {name}, just checking in on the proposal. If there are any questions or if you need me to present it to your broader team, I'm happy to help.",
        ],
    }
}

/// Fill every placeholder from prospect fields and fixed fillers.
///
/// Every template placeholder must resolve for any valid prospect: missing
/// contacts and pain points fall back to generic filler text.
fn fill_template(template: &str, prospect: &Prospect) -> String {
    let name = prospect
        .primary_contact()
        .map(|c| first_name(&c.name).to_string())
        .unwrap_or_else(|| "there".to_string());
    let pain_point = prospect
        .pain_points
        .first()
        .cloned()
        .unwrap_or_else(|| "your current challenges".to_string());
    let segment = prospect.segment.as_str().to_lowercase();

    template
        .replace("{name}", &name)
        .replace("{company}", &prospect.company)
        .replace("{pain_point}", &pain_point)
        .replace("{specific_area}", &pain_point)
        .replace("{specific_challenge}", &pain_point)
        .replace("{solution}", "our solution")
        .replace("{topic}", &segment)
        .replace("{industry}", &segment)
        .replace("{result}", "40% operational efficiency improvement")
        .replace("{alternative_time}", "next Tuesday afternoon")
        .replace("{lower_price}", "$5,000/month")
        .replace("{timeframe}", "next quarter")
        .replace("{next_quarter}", "2")
        .replace("{deliverable}", "the case study we discussed")
        .replace("{date}", "next Thursday")
        .replace("{concern}", "integration complexity")
}

/// Infer the drafting context at a fixed point in time.
///
/// Driven by the last conversation (replied? how long ago? sentiment?
/// budget/busy keywords in the reply), with pipeline status overriding to a
/// dedicated context for scheduled meetings and sent proposals.
pub fn infer_context_at(prospect: &Prospect, now: DateTime<Utc>) -> FollowUpContext {
    // Nothing logged yet: always an opener, even for late-stage statuses
    let Some(last) = prospect.last_conversation() else {
        return FollowUpContext::NoReplyFirst;
    };

    let gap = days_between_iso(&last.date, now).unwrap_or(i64::MAX);
    let reply = last
        .reply_message
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    let mut context = if !last.replied && gap > 7 {
        FollowUpContext::NoReplySecond
    } else if !last.replied {
        FollowUpContext::NoReplyFirst
    } else if last.sentiment == Some(Sentiment::Positive) {
        FollowUpContext::PositiveResponse
    } else if reply.contains("budget") {
        FollowUpContext::BudgetObjection
    } else if reply.contains("busy") {
        FollowUpContext::TimingObjection
    } else {
        FollowUpContext::NoReplyFirst
    };

    if prospect.status == ProspectStatus::MeetingScheduled {
        context = FollowUpContext::PostMeeting;
    } else if prospect.status == ProspectStatus::ProposalSent {
        context = FollowUpContext::ProposalSent;
    }

    context
}

/// Infer the drafting context against the current wall clock.
pub fn infer_context(prospect: &Prospect) -> FollowUpContext {
    infer_context_at(prospect, Utc::now())
}

/// Draft a follow-up message for an explicit context.
///
/// Template selection is uniform-random over the context's bank; callers
/// must not assume repeatability unless they seed the RNG themselves.
pub async fn compose_follow_up<R: Rng>(
    prospect: &Prospect,
    context: FollowUpContext,
    rng: &mut R,
) -> String {
    tokio::time::sleep(std::time::Duration::from_millis(DRAFT_LATENCY_MS)).await;

    let bank = templates_for(context);
    let template = bank[rng.random_range(0..bank.len())];
    fill_template(template, prospect)
}

/// Infer the context from prospect state, then draft.
pub async fn compose_contextual_follow_up<R: Rng>(prospect: &Prospect, rng: &mut R) -> String {
    let context = infer_context(prospect);
    compose_follow_up(prospect, context, rng).await
}

/// Draft follow-ups for a batch of prospects, keyed by prospect id.
pub async fn batch_compose<R: Rng>(
    prospects: &[Prospect],
    rng: &mut R,
) -> HashMap<String, String> {
    let mut drafts = HashMap::new();
    for prospect in prospects {
        let draft = compose_contextual_follow_up(prospect, rng).await;
        drafts.insert(prospect.id.clone(), draft);
    }
    drafts
}
