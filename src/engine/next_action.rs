//! Next-best-action recommendation.
//!
//! A decision tree over pipeline status and days since the last logged
//! conversation. Produces an unsaved `NextAction` — the caller persists it
//! via the record store.

use chrono::{DateTime, Duration, Utc};

use crate::types::{ActionType, NextAction, Prospect, ProspectStatus, Sentiment};
use crate::util::{days_between_iso, generate_id};

/// Stand-in gap when a prospect has no conversations yet.
const NO_CONTACT_GAP_DAYS: i64 = 999;

/// Suggest the next action for a prospect at a fixed point in time.
///
/// Deterministic given the prospect state and `now`; `now` only feeds the
/// due-date computation and the contact-gap branches. The returned action is
/// marked engine-suggested and not completed.
pub fn suggest_next_action_at(prospect: &Prospect, now: DateTime<Utc>) -> NextAction {
    let last = prospect.last_conversation();
    let days_since_contact = last
        .and_then(|c| days_between_iso(&c.date, now))
        .unwrap_or(NO_CONTACT_GAP_DAYS);

    let primary_name = prospect
        .primary_contact()
        .map(|c| c.name.as_str())
        .unwrap_or("the primary contact");
    let first_pain_point = prospect
        .pain_points
        .first()
        .map(String::as_str)
        .unwrap_or("their current challenges");

    let mut action_type = ActionType::FollowUp;
    let mut notes = String::new();
    let mut days_until_due = 7;

    match prospect.status {
        ProspectStatus::NotContacted => {
            action_type = ActionType::FollowUp;
            notes = format!("Initial outreach to {primary_name}. Focus on {first_pain_point}.");
            days_until_due = 1;
        }
        ProspectStatus::Contacted => {
            if days_since_contact > 7 {
                action_type = ActionType::FollowUp;
                notes = "Second follow-up. Share case study from similar industry.".to_string();
                days_until_due = 2;
            } else if days_since_contact > 3 {
                action_type = ActionType::FollowUp;
                notes = "First follow-up. Reference their recent company news or LinkedIn activity."
                    .to_string();
                days_until_due = 4;
            }
            // Within 3 days: too early for another touch, defaults stand
        }
        ProspectStatus::Replied => {
            if last.and_then(|c| c.sentiment) == Some(Sentiment::Positive) {
                action_type = ActionType::ScheduleDemo;
                notes = "Prospect showed interest. Offer 15-min demo or discovery call."
                    .to_string();
                days_until_due = 2;
            } else {
                action_type = ActionType::SendCaseStudy;
                notes = "Send relevant case study and ROI calculator.".to_string();
                days_until_due = 3;
            }
        }
        ProspectStatus::MeetingScheduled => {
            action_type = ActionType::ScheduleDemo;
            notes = "Prepare custom demo focusing on their specific pain points.".to_string();
            days_until_due = 1;
        }
        ProspectStatus::ProposalSent => {
            if days_since_contact > 5 {
                action_type = ActionType::FollowUp;
                notes = "Follow up on proposal. Offer to present to wider team.".to_string();
                days_until_due = 1;
            } else {
                action_type = ActionType::NegotiateTerms;
                notes = "Prepare to address pricing and implementation questions.".to_string();
                days_until_due = 5;
            }
        }
        ProspectStatus::Negotiating => {
            action_type = ActionType::CloseDeal;
            notes = "Work with legal to finalize contract terms. Stay responsive.".to_string();
            days_until_due = 3;
        }
        ProspectStatus::ClosedWon | ProspectStatus::ClosedLost => {
            action_type = ActionType::FollowUp;
            notes = "General follow-up to maintain engagement.".to_string();
            days_until_due = 7;
        }
    }

    NextAction {
        id: generate_id(),
        action_type,
        due_date: (now + Duration::days(days_until_due)).to_rfc3339(),
        completed: false,
        notes,
        engine_suggested: true,
    }
}

/// Suggest the next action against the current wall clock.
pub fn suggest_next_action(prospect: &Prospect) -> NextAction {
    suggest_next_action_at(prospect, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::{sample_conversation, sample_prospect};
    use crate::util::parse_iso;

    fn prospect_with_gap(status: ProspectStatus, days_ago: i64, now: DateTime<Utc>) -> Prospect {
        let mut p = sample_prospect("p", "P Inc");
        p.status = status;
        let mut conv = sample_conversation("p", false);
        conv.sentiment = None;
        conv.date = (now - Duration::days(days_ago)).to_rfc3339();
        p.conversations.push(conv);
        p
    }

    #[test]
    fn test_contacted_ten_day_gap_is_urgent_follow_up() {
        let now = Utc::now();
        let p = prospect_with_gap(ProspectStatus::Contacted, 10, now);

        let action = suggest_next_action_at(&p, now);
        assert_eq!(action.action_type, ActionType::FollowUp);
        assert!(action.notes.contains("Second follow-up"));
        assert!(action.engine_suggested);
        assert!(!action.completed);

        let due = parse_iso(&action.due_date).expect("parse due date");
        assert_eq!((due - now).num_days(), 2);
    }

    #[test]
    fn test_contacted_five_day_gap() {
        let now = Utc::now();
        let p = prospect_with_gap(ProspectStatus::Contacted, 5, now);
        let action = suggest_next_action_at(&p, now);
        assert_eq!(action.action_type, ActionType::FollowUp);
        assert!(action.notes.contains("First follow-up"));
        let due = parse_iso(&action.due_date).expect("parse");
        assert_eq!((due - now).num_days(), 4);
    }

    #[test]
    fn test_contacted_recent_touch_backs_off() {
        let now = Utc::now();
        let p = prospect_with_gap(ProspectStatus::Contacted, 1, now);
        let action = suggest_next_action_at(&p, now);
        assert_eq!(action.action_type, ActionType::FollowUp);
        assert!(action.notes.is_empty());
        let due = parse_iso(&action.due_date).expect("parse");
        assert_eq!((due - now).num_days(), 7);
    }

    #[test]
    fn test_not_contacted_references_contact_and_pain_point() {
        let now = Utc::now();
        let p = sample_prospect("p", "P Inc");
        let action = suggest_next_action_at(&p, now);
        assert_eq!(action.action_type, ActionType::FollowUp);
        assert!(action.notes.contains("Alex Morgan"));
        assert!(action.notes.contains("Manual reporting"));
        let due = parse_iso(&action.due_date).expect("parse");
        assert_eq!((due - now).num_days(), 1);
    }

    #[test]
    fn test_not_contacted_without_contacts_still_resolves() {
        let now = Utc::now();
        let mut p = sample_prospect("p", "P Inc");
        p.contacts.clear();
        p.pain_points.clear();
        let action = suggest_next_action_at(&p, now);
        assert!(action.notes.contains("the primary contact"));
        assert!(action.notes.contains("their current challenges"));
    }

    #[test]
    fn test_replied_positive_suggests_demo() {
        let now = Utc::now();
        let mut p = prospect_with_gap(ProspectStatus::Replied, 1, now);
        p.conversations.last_mut().unwrap().sentiment = Some(Sentiment::Positive);
        let action = suggest_next_action_at(&p, now);
        assert_eq!(action.action_type, ActionType::ScheduleDemo);
    }

    #[test]
    fn test_replied_non_positive_sends_case_study() {
        let now = Utc::now();
        let p = prospect_with_gap(ProspectStatus::Replied, 1, now);
        let action = suggest_next_action_at(&p, now);
        assert_eq!(action.action_type, ActionType::SendCaseStudy);
        let due = parse_iso(&action.due_date).expect("parse");
        assert_eq!((due - now).num_days(), 3);
    }

    #[test]
    fn test_proposal_sent_branches_on_gap() {
        let now = Utc::now();

        let stale = prospect_with_gap(ProspectStatus::ProposalSent, 6, now);
        let action = suggest_next_action_at(&stale, now);
        assert_eq!(action.action_type, ActionType::FollowUp);

        let fresh = prospect_with_gap(ProspectStatus::ProposalSent, 2, now);
        let action = suggest_next_action_at(&fresh, now);
        assert_eq!(action.action_type, ActionType::NegotiateTerms);
    }

    #[test]
    fn test_negotiating_suggests_close() {
        let now = Utc::now();
        let p = prospect_with_gap(ProspectStatus::Negotiating, 1, now);
        let action = suggest_next_action_at(&p, now);
        assert_eq!(action.action_type, ActionType::CloseDeal);
    }

    #[test]
    fn test_no_conversations_counts_as_infinite_gap() {
        let now = Utc::now();
        let mut p = sample_prospect("p", "P Inc");
        p.status = ProspectStatus::ProposalSent;
        // No conversations at all: treated like a very stale proposal
        let action = suggest_next_action_at(&p, now);
        assert_eq!(action.action_type, ActionType::FollowUp);
        assert!(action.notes.contains("proposal"));
    }

    #[test]
    fn test_idempotent_for_unchanged_prospect() {
        let now = Utc::now();
        let p = prospect_with_gap(ProspectStatus::Contacted, 10, now);

        let a = suggest_next_action_at(&p, now);
        let b = suggest_next_action_at(&p, now);
        assert_eq!(a.action_type, b.action_type);
        assert_eq!(a.notes, b.notes);
        assert_eq!(a.due_date, b.due_date);
        // Ids are fresh per suggestion
        assert_ne!(a.id, b.id);
    }
}
