//! Domain model for the sales pipeline.
//!
//! A `Prospect` is the unit of storage: one organization being pursued, with
//! its contacts, logged conversations, and pending next actions embedded as
//! ordered collections. JSON field names match the exported data format, so a
//! store dump round-trips through serde unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::days_between_iso;

/// Pipeline stage, ordered. `ClosedLost` is a terminal side branch reachable
/// from any non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProspectStatus {
    NotContacted,
    Contacted,
    Replied,
    MeetingScheduled,
    ProposalSent,
    Negotiating,
    ClosedWon,
    ClosedLost,
}

impl ProspectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProspectStatus::NotContacted => "not_contacted",
            ProspectStatus::Contacted => "contacted",
            ProspectStatus::Replied => "replied",
            ProspectStatus::MeetingScheduled => "meeting_scheduled",
            ProspectStatus::ProposalSent => "proposal_sent",
            ProspectStatus::Negotiating => "negotiating",
            ProspectStatus::ClosedWon => "closed_won",
            ProspectStatus::ClosedLost => "closed_lost",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "contacted" => ProspectStatus::Contacted,
            "replied" => ProspectStatus::Replied,
            "meeting_scheduled" => ProspectStatus::MeetingScheduled,
            "proposal_sent" => ProspectStatus::ProposalSent,
            "negotiating" => ProspectStatus::Negotiating,
            "closed_won" => ProspectStatus::ClosedWon,
            "closed_lost" => ProspectStatus::ClosedLost,
            _ => ProspectStatus::NotContacted,
        }
    }

    /// Position in the forward pipeline, or `None` for `ClosedLost`.
    /// A prospect at rank N has reached every stage with rank ≤ N.
    pub fn stage_rank(&self) -> Option<u8> {
        match self {
            ProspectStatus::NotContacted => Some(0),
            ProspectStatus::Contacted => Some(1),
            ProspectStatus::Replied => Some(2),
            ProspectStatus::MeetingScheduled => Some(3),
            ProspectStatus::ProposalSent => Some(4),
            ProspectStatus::Negotiating => Some(5),
            ProspectStatus::ClosedWon => Some(6),
            ProspectStatus::ClosedLost => None,
        }
    }
}

/// Industry classification tag (ICP segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Energy,
    Water,
    Proptech,
    #[serde(rename = "Material Sciences")]
    MaterialSciences,
    #[serde(rename = "Waste Valorization")]
    WasteValorization,
    #[serde(rename = "Logistics & Supply Chain")]
    LogisticsSupplyChain,
    #[serde(rename = "Health & Hygiene")]
    HealthHygiene,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Energy => "Energy",
            Segment::Water => "Water",
            Segment::Proptech => "Proptech",
            Segment::MaterialSciences => "Material Sciences",
            Segment::WasteValorization => "Waste Valorization",
            Segment::LogisticsSupplyChain => "Logistics & Supply Chain",
            Segment::HealthHygiene => "Health & Hygiene",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "Water" => Segment::Water,
            "Proptech" => Segment::Proptech,
            "Material Sciences" => Segment::MaterialSciences,
            "Waste Valorization" => Segment::WasteValorization,
            "Logistics & Supply Chain" => Segment::LogisticsSupplyChain,
            "Health & Hygiene" => Segment::HealthHygiene,
            _ => Segment::Energy,
        }
    }
}

/// Channel a conversation happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Linkedin,
    Email,
    Phone,
    Meeting,
}

/// Classified emotional tone of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Unknown,
}

/// Kind of follow-up task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    FollowUp,
    SendCaseStudy,
    ScheduleDemo,
    SendProposal,
    NegotiateTerms,
    CloseDeal,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::FollowUp => "follow_up",
            ActionType::SendCaseStudy => "send_case_study",
            ActionType::ScheduleDemo => "schedule_demo",
            ActionType::SendProposal => "send_proposal",
            ActionType::NegotiateTerms => "negotiate_terms",
            ActionType::CloseDeal => "close_deal",
        }
    }
}

/// A person at the prospect. The first contact in a prospect's list is the
/// primary contact; insertion order is engagement priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub linkedin_url: String,
    /// Independently maintained 0–10 score; not derived by the engine.
    pub engagement_score: f64,
    pub messaging_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contacted: Option<String>,
}

/// One logged interaction. `contact_id` is a weak reference into the owning
/// prospect's contact list (lookup only, no ownership).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub contact_id: String,
    /// RFC 3339 timestamp. Conversations are chronological by insertion order.
    pub date: String,
    pub channel: Channel,
    pub message: String,
    pub replied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_message: Option<String>,
    /// `None` until a reply has been classified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

/// A pending or completed follow-up task. Completion is one-way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextAction {
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub due_date: String,
    pub completed: bool,
    pub notes: String,
    /// True when the recommendation engine produced this action.
    pub engine_suggested: bool,
}

/// An organization being pursued through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prospect {
    pub id: String,
    pub company: String,
    pub website: String,
    pub segment: Segment,
    pub status: ProspectStatus,
    pub pain_points: Vec<String>,
    // Qualification scores are externally assigned and static here; the
    // engine reads them but never recomputes them. All clamped to [0, 10].
    pub decision_maker_accessibility: f64,
    pub budget_authority: f64,
    pub strategic_fit: f64,
    pub overall_score: f64,
    pub contacts: Vec<Contact>,
    pub conversations: Vec<Conversation>,
    pub next_actions: Vec<NextAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dossier_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Prospect {
    /// Primary contact (first in the list), if any.
    pub fn primary_contact(&self) -> Option<&Contact> {
        self.contacts.first()
    }

    /// Most recent logged conversation, if any.
    pub fn last_conversation(&self) -> Option<&Conversation> {
        self.conversations.last()
    }

    /// Days since this prospect entered the pipeline, derived from `created_at`.
    pub fn days_in_pipeline(&self, now: DateTime<Utc>) -> i64 {
        days_between_iso(&self.created_at, now).unwrap_or(0).max(0)
    }

    /// Next actions sorted by due date (pending first is the caller's concern;
    /// storage order is unordered).
    pub fn actions_by_due_date(&self) -> Vec<&NextAction> {
        let mut actions: Vec<&NextAction> = self.next_actions.iter().collect();
        actions.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        actions
    }
}

/// Partial update for a prospect's scalar fields. `None` leaves a field
/// untouched; collections are updated through their own append operations.
#[derive(Debug, Clone, Default)]
pub struct ProspectUpdate {
    pub company: Option<String>,
    pub website: Option<String>,
    pub segment: Option<Segment>,
    pub status: Option<ProspectStatus>,
    pub pain_points: Option<Vec<String>>,
    pub decision_maker_accessibility: Option<f64>,
    pub budget_authority: Option<f64>,
    pub strategic_fit: Option<f64>,
    pub overall_score: Option<f64>,
    pub deal_value: Option<f64>,
    pub notes: Option<String>,
    pub dossier_url: Option<String>,
}

/// Aggregate funnel statistics. Stage counts use "reached at least this
/// stage" semantics; `closed_lost` prospects count toward the total and as
/// contacted, but toward no later stage.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    pub total_prospects: usize,
    pub contacted: usize,
    pub replied: usize,
    pub meetings_scheduled: usize,
    pub proposals_sent: usize,
    pub deals_closed: usize,
    pub total_deal_value: f64,
    /// Percentage: closed deals over contacted prospects.
    pub conversion_rate: f64,
    pub average_deal_value: f64,
}
