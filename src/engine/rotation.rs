//! Deterministic round-robin rotation for group duties
//!
//! This module implements the multi-week rotation that ensures:
//! - Every group serves once before any group serves twice
//! - Deterministic ordering (same groups and index always produce the same plan)
//! - Resumable plans: a carried-over index continues exactly where a
//!   previous plan stopped

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use super::eligibility::eligible_groups;
use super::error::{EngineError, EngineResult};
use crate::models::{EntityId, Group, RoleId, Roster, Schedule, SlotUpdate, SubEvent};

// ============================================================================
// Groups Per Event
// ============================================================================

/// How many groups one period's sub-events consume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GroupsPerEvent {
    /// One group serves both sub-events
    #[default]
    One,
    /// One group per sub-event
    Two,
    /// Two groups per sub-event
    Four,
}

impl GroupsPerEvent {
    /// Rotation index advance per period
    pub fn step(&self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    /// Groups serving each sub-event
    pub fn per_sub_event(&self) -> usize {
        match self {
            Self::One | Self::Two => 1,
            Self::Four => 2,
        }
    }
}

impl TryFrom<u8> for GroupsPerEvent {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            other => Err(EngineError::invalid_config(
                "groups_per_event",
                format!("must be 1, 2 or 4, got {}", other),
            )),
        }
    }
}

impl From<GroupsPerEvent> for u8 {
    fn from(value: GroupsPerEvent) -> Self {
        value.step() as u8
    }
}

impl fmt::Display for GroupsPerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.step())
    }
}

// ============================================================================
// Rotation Plan
// ============================================================================

/// Groups serving one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRotation {
    /// Position of the period within the plan (0-based)
    pub offset: usize,
    pub sub_event_a: Vec<EntityId>,
    pub sub_event_b: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPlan {
    pub groups_per_event: GroupsPerEvent,
    /// Position in the group list the plan started at
    pub start_index: usize,
    /// Position to carry into the next plan, always below the group count
    pub next_index: usize,
    pub periods: Vec<PeriodRotation>,
}

impl RotationPlan {
    /// Map the plan onto the slots of `role`, one plan period per schedule
    /// period starting at `first_period`.
    ///
    /// Sub-event A fills the role's slots not marked B, sub-event B fills the
    /// slots marked B, in slot order. Slots beyond the planned groups are
    /// cleared: the rotation replaces whatever the targeted slots held.
    ///
    /// # Returns
    /// The updates to apply; the schedule itself is not touched
    pub fn to_updates(
        &self,
        schedule: &Schedule,
        role: RoleId,
        first_period: NaiveDate,
    ) -> EngineResult<Vec<SlotUpdate>> {
        let targets = schedule.periods_from(first_period);
        if targets.len() < self.periods.len() {
            return Err(EngineError::ScheduleTooShort {
                from: first_period,
                needed: self.periods.len(),
                available: targets.len(),
            });
        }

        let mut updates = Vec::new();
        for (planned, period) in self.periods.iter().zip(targets) {
            for (sub_event, groups) in [
                (SubEvent::A, &planned.sub_event_a),
                (SubEvent::B, &planned.sub_event_b),
            ] {
                let slots: Vec<_> = period
                    .slots_for_role(role)
                    .filter(|s| match sub_event {
                        SubEvent::A => s.sub_event != Some(SubEvent::B),
                        SubEvent::B => s.sub_event == Some(SubEvent::B),
                    })
                    .collect();

                if slots.len() < groups.len() {
                    warn!(
                        period = %period.start,
                        role = %role,
                        sub_event = ?sub_event,
                        slots = slots.len(),
                        groups = groups.len(),
                        "Period has fewer slots than planned groups"
                    );
                }

                for (i, slot) in slots.iter().enumerate() {
                    updates.push(SlotUpdate {
                        period: period.start,
                        slot_id: slot.id.clone(),
                        assignee: groups.get(i).cloned(),
                    });
                }
            }
        }

        Ok(updates)
    }
}

// ============================================================================
// Rotation Planner
// ============================================================================

/// Round-robin allocator over a group list
///
/// Advances a single rotating index: by 1 per period when one group covers
/// both sub-events, by 2 when each sub-event has its own group, by 4 when
/// each sub-event has two groups. Wrap-around is modulo the group count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationPlanner {
    groups_per_event: GroupsPerEvent,
    start_index: usize,
}

impl RotationPlanner {
    pub fn new(groups_per_event: GroupsPerEvent) -> Self {
        Self {
            groups_per_event,
            start_index: 0,
        }
    }

    /// Resume from the index a previous plan stopped at
    ///
    /// Any index is accepted; it is taken modulo the group count.
    pub fn with_start_index(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }

    /// Plan `period_count` periods over `groups`
    ///
    /// # Errors
    /// [`EngineError::NoGroupsAvailable`] when `groups` is empty
    pub fn plan(&self, groups: &[Group], period_count: usize) -> EngineResult<RotationPlan> {
        let ids: Vec<&EntityId> = groups.iter().map(|g| &g.id).collect();
        self.plan_ids(None, &ids, period_count)
    }

    /// Plan the eligible groups of `role` from the roster
    pub fn plan_for_role(
        &self,
        role: RoleId,
        roster: &Roster,
        period_count: usize,
    ) -> EngineResult<RotationPlan> {
        let groups: Vec<&EntityId> = eligible_groups(role, roster)
            .into_iter()
            .map(|g| &g.id)
            .collect();
        let plan = self.plan_ids(Some(role), &groups, period_count)?;

        info!(
            role = %role,
            groups = groups.len(),
            periods = period_count,
            groups_per_event = %self.groups_per_event,
            next_index = plan.next_index,
            "Planned group rotation"
        );
        Ok(plan)
    }

    fn plan_ids(
        &self,
        role: Option<RoleId>,
        groups: &[&EntityId],
        period_count: usize,
    ) -> EngineResult<RotationPlan> {
        if groups.is_empty() {
            return Err(EngineError::NoGroupsAvailable { role });
        }

        let n = groups.len();
        let pick = |i: usize| groups[i % n].clone();
        let per_sub_event = self.groups_per_event.per_sub_event();
        let start_index = self.start_index % n;
        let mut index = start_index;
        let mut periods = Vec::with_capacity(period_count);

        for offset in 0..period_count {
            let (sub_event_a, sub_event_b) = match self.groups_per_event {
                GroupsPerEvent::One => (vec![pick(index)], vec![pick(index)]),
                _ => (
                    (0..per_sub_event).map(|k| pick(index + k)).collect(),
                    (0..per_sub_event)
                        .map(|k| pick(index + per_sub_event + k))
                        .collect(),
                ),
            };

            periods.push(PeriodRotation {
                offset,
                sub_event_a,
                sub_event_b,
            });
            index = (index + self.groups_per_event.step()) % n;
        }

        Ok(RotationPlan {
            groups_per_event: self.groups_per_event,
            start_index,
            next_index: index,
            periods,
        })
    }
}

/// Plan `period_count` periods over `groups` from index 0
pub fn plan_rotation(
    groups: &[Group],
    period_count: usize,
    groups_per_event: GroupsPerEvent,
) -> EngineResult<RotationPlan> {
    RotationPlanner::new(groups_per_event).plan(groups, period_count)
}

// ============================================================================
// Pool Rotation
// ============================================================================

/// Rotate individuals through a multi-person duty
///
/// Period `w` takes `per_period` consecutive people starting at
/// `start_offset + w * per_period`, wrapping around the pool. `per_period`
/// is capped at the pool size so nobody serves twice in one period.
///
/// # Errors
/// [`EngineError::EmptyRotationPool`] for an empty pool,
/// [`EngineError::InvalidConfiguration`] when `per_period` is 0
pub fn plan_pool_rotation(
    role: RoleId,
    pool: &[EntityId],
    per_period: usize,
    period_count: usize,
    start_offset: usize,
) -> EngineResult<Vec<Vec<EntityId>>> {
    if pool.is_empty() {
        return Err(EngineError::empty_pool(role));
    }
    if per_period == 0 {
        return Err(EngineError::invalid_config(
            "per_period",
            "at least one person must serve each period",
        ));
    }

    let len = pool.len();
    let take = per_period.min(len);
    let advance = per_period % len;
    let mut cursor = start_offset % len;

    let mut periods = Vec::with_capacity(period_count);
    for _ in 0..period_count {
        periods.push((0..take).map(|i| pool[(cursor + i) % len].clone()).collect());
        cursor = (cursor + advance) % len;
    }
    Ok(periods)
}

/// Pool position the rotation after `period_count` periods starts at
///
/// Matches [`plan_pool_rotation`] with the same arguments; always below
/// `pool_len`, or 0 for an empty pool.
pub fn next_pool_offset(
    pool_len: usize,
    per_period: usize,
    period_count: usize,
    start_offset: usize,
) -> usize {
    if pool_len == 0 {
        return 0;
    }
    let advance = (per_period % pool_len) * (period_count % pool_len) % pool_len;
    (start_offset % pool_len + advance) % pool_len
}

/// Map a pool rotation onto the slots of `role`, one entry per schedule period
/// starting at `first_period`. Slots are filled in slot order regardless of
/// sub-event; slots beyond the planned people are cleared.
pub fn pool_rotation_updates(
    schedule: &Schedule,
    role: RoleId,
    first_period: NaiveDate,
    rotation: &[Vec<EntityId>],
) -> EngineResult<Vec<SlotUpdate>> {
    let targets = schedule.periods_from(first_period);
    if targets.len() < rotation.len() {
        return Err(EngineError::ScheduleTooShort {
            from: first_period,
            needed: rotation.len(),
            available: targets.len(),
        });
    }

    let mut updates = Vec::new();
    for (people, period) in rotation.iter().zip(targets) {
        let slots: Vec<_> = period.slots_for_role(role).collect();
        if slots.len() < people.len() {
            warn!(
                period = %period.start,
                role = %role,
                slots = slots.len(),
                people = people.len(),
                "Period has fewer slots than rotated people"
            );
        }

        updates.extend(slots.iter().enumerate().map(|(i, slot)| SlotUpdate {
            period: period.start,
            slot_id: slot.id.clone(),
            assignee: people.get(i).cloned(),
        }));
    }

    Ok(updates)
}

// ============================================================================
// Tests
// ============================================================================
