use chrono::{DateTime, Duration, Utc};

use super::*;
use crate::types::PipelineStats;
use crate::util::parse_iso;

impl ProspectDb {
    /// Aggregate funnel statistics over the whole store.
    ///
    /// Stage counts use reached-at-least semantics (a negotiating prospect
    /// also counts as contacted, replied, …). `closed_lost` rows count as
    /// contacted but drop out of every later stage count.
    pub fn pipeline_stats(&self) -> Result<PipelineStats, StoreError> {
        let all = self.get_all()?;

        let reached = |min_rank: u8| {
            all.iter()
                .filter(|p| p.status.stage_rank().is_some_and(|r| r >= min_rank))
                .count()
        };

        let contacted = all
            .iter()
            .filter(|p| p.status != ProspectStatus::NotContacted)
            .count();
        let closed = all
            .iter()
            .filter(|p| p.status == ProspectStatus::ClosedWon)
            .count();
        let total_deal_value: f64 = all
            .iter()
            .filter(|p| p.status == ProspectStatus::ClosedWon)
            .filter_map(|p| p.deal_value)
            .sum();

        Ok(PipelineStats {
            total_prospects: all.len(),
            contacted,
            replied: reached(2),
            meetings_scheduled: reached(3),
            proposals_sent: reached(4),
            deals_closed: closed,
            total_deal_value,
            conversion_rate: if contacted > 0 {
                closed as f64 / contacted as f64 * 100.0
            } else {
                0.0
            },
            average_deal_value: if closed > 0 {
                total_deal_value / closed as f64
            } else {
                0.0
            },
        })
    }

    /// Pending actions whose due date has passed, paired with their prospect.
    pub fn overdue_actions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(Prospect, NextAction)>, StoreError> {
        let mut overdue = Vec::new();
        for prospect in self.get_all()? {
            for action in &prospect.next_actions {
                if action.completed {
                    continue;
                }
                if parse_iso(&action.due_date).is_some_and(|due| due < now) {
                    overdue.push((prospect.clone(), action.clone()));
                }
            }
        }
        Ok(overdue)
    }

    /// Pending actions due within the next `days`, sorted by due date.
    pub fn upcoming_actions(
        &self,
        days: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<(Prospect, NextAction)>, StoreError> {
        let horizon = now + Duration::days(days);
        let mut upcoming = Vec::new();
        for prospect in self.get_all()? {
            for action in &prospect.next_actions {
                if action.completed {
                    continue;
                }
                if let Some(due) = parse_iso(&action.due_date) {
                    if due >= now && due <= horizon {
                        upcoming.push((prospect.clone(), action.clone()));
                    }
                }
            }
        }
        upcoming.sort_by(|a, b| a.1.due_date.cmp(&b.1.due_date));
        Ok(upcoming)
    }
}
