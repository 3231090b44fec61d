//! Greedy auto-fill of person duties
//!
//! Walks the targeted periods in order and, for every empty person-duty slot,
//! takes the best-ranked candidate that does not clash with what the period
//! already holds. There is no backtracking: a slot nobody fits stays empty
//! for the operator.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::conflict::ConflictDetector;
use super::error::{EngineError, EngineResult};
use super::ranker::CandidateRanker;
use super::settings::EngineSettings;
use crate::models::{EntityId, RoleId, Roster, Schedule, SlotUpdate};

/// Plan assignments for the empty person-duty slots of `periods`
///
/// Every pick is applied to a working copy before the next slot is ranked, so
/// later periods see earlier picks as history. The caller's schedule is left
/// untouched; apply the returned updates to commit them.
pub fn auto_fill(
    schedule: &Schedule,
    roster: &Roster,
    settings: &EngineSettings,
    periods: &[NaiveDate],
) -> EngineResult<Vec<SlotUpdate>> {
    for date in periods {
        if schedule.period(*date).is_none() {
            return Err(EngineError::PeriodNotFound { date: *date });
        }
    }

    let detector = ConflictDetector::new(
        &settings.conflict_groups,
        settings.avoid_same_family_same_day,
    );
    let mut working = schedule.clone();
    let mut updates = Vec::new();

    for &date in periods {
        let open: Vec<_> = working
            .period(date)
            .map(|p| {
                p.slots
                    .iter()
                    .filter(|s| !s.is_filled() && !s.role.is_group_duty())
                    .map(|s| (s.id.clone(), s.role))
                    .collect()
            })
            .unwrap_or_default();

        for (slot_id, role) in open {
            let choice = pick(&working, roster, settings, &detector, date, &slot_id, role);

            match choice {
                Some(entity) => {
                    working.assign(date, &slot_id, Some(entity.clone()))?;
                    updates.push(SlotUpdate::assign(date, slot_id, entity));
                }
                None => debug!(period = %date, slot = %slot_id, "Left slot empty"),
            }
        }
    }

    info!(
        periods = periods.len(),
        filled = updates.len(),
        "Auto-fill planned"
    );
    Ok(updates)
}

fn pick(
    working: &Schedule,
    roster: &Roster,
    settings: &EngineSettings,
    detector: &ConflictDetector<'_>,
    date: NaiveDate,
    slot_id: &str,
    role: RoleId,
) -> Option<EntityId> {
    let period = working.period(date)?;
    let ranking = CandidateRanker::new(roster, working, settings).rank(role, date, Some(slot_id));

    ranking
        .candidates()
        .iter()
        .find(|c| !detector.would_conflict(period, slot_id, &c.entity_id, roster))
        .map(|c| c.entity_id.clone())
}
