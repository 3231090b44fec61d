//! Period review
//!
//! Collects every advisory finding for one period: conflicts, assignments
//! recorded outside eligibility, and services inside their minimum gap.
//! Findings are warnings for the host to render; none of them blocks a save.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::conflict::{Conflict, ConflictDetector};
use super::eligibility::is_entity_eligible;
use super::error::{EngineError, EngineResult};
use super::history::HistoryTracker;
use super::settings::EngineSettings;
use crate::models::{EntityId, RoleId, Roster, Schedule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "finding", rename_all = "snake_case")]
pub enum Finding {
    Conflict(Conflict),
    /// Operator override: the assignee does not (or no longer) qualify
    NotEligible {
        slot_id: String,
        role: RoleId,
        entity_id: EntityId,
    },
    /// Same entity, same role, too soon after the previous service
    GapViolation {
        slot_id: String,
        role: RoleId,
        entity_id: EntityId,
        periods_since: usize,
        min_gap: u32,
    },
}

impl Finding {
    /// French message for the host's warning banner
    pub fn french_desc(&self, roster: &Roster) -> String {
        let name = |id: &EntityId| {
            roster
                .display_name(id)
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string())
        };

        match self {
            Self::Conflict(conflict) => {
                let names: Vec<_> = conflict.entities.iter().map(name).collect();
                format!(
                    "Conflit ({}): {} sur {}",
                    conflict.groups.join(", "),
                    names.join(", "),
                    conflict.slot_ids.join(", ")
                )
            }
            Self::NotEligible {
                role, entity_id, ..
            } => format!(
                "{} n'est pas qualifié(e) pour « {} »",
                name(entity_id),
                role.french_label()
            ),
            Self::GapViolation {
                role,
                entity_id,
                periods_since,
                min_gap,
                ..
            } => format!(
                "{} a déjà eu « {} » il y a {} semaine(s) (minimum {})",
                name(entity_id),
                role.french_label(),
                periods_since,
                min_gap
            ),
        }
    }
}

/// Review the period starting at `date`
pub fn review_period(
    schedule: &Schedule,
    date: NaiveDate,
    roster: &Roster,
    settings: &EngineSettings,
) -> EngineResult<Vec<Finding>> {
    let period = schedule
        .period(date)
        .ok_or(EngineError::PeriodNotFound { date })?;

    let detector = ConflictDetector::new(
        &settings.conflict_groups,
        settings.avoid_same_family_same_day,
    );
    let mut findings: Vec<Finding> = detector
        .find_conflicts(period, roster)
        .into_iter()
        .map(Finding::Conflict)
        .collect();

    let tracker = HistoryTracker::build(schedule, date);
    for (slot, entity) in period.filled_slots() {
        if !is_entity_eligible(slot.role, entity, roster) {
            findings.push(Finding::NotEligible {
                slot_id: slot.id.clone(),
                role: slot.role,
                entity_id: entity.clone(),
            });
        }

        let periods_since = tracker.periods_since(tracker.last_served(entity, &[slot.role]));
        if settings.interval.violates_gap(slot.role, periods_since) {
            findings.push(Finding::GapViolation {
                slot_id: slot.id.clone(),
                role: slot.role,
                entity_id: entity.clone(),
                periods_since: periods_since.unwrap_or_default(),
                min_gap: settings.interval.min_gap(slot.role),
            });
        }
    }

    Ok(findings)
}
