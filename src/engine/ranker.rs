//! Candidate ranker
//!
//! Combines the eligibility index and the history tracker into an ordered
//! suggestion list for one slot. The ranking is advisory: the operator may
//! pick anyone from it, or outside it.
//!
//! Ordering, for the default [`SortCriteria::LastAssignment`]:
//! 1. Longest time since last service first, never-served before everyone
//! 2. Ties keep roster order (stable sort)
//! 3. Candidates inside their minimum gap move to the end, same relative order

use chrono::NaiveDate;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use super::eligibility::eligible_entities;
use super::history::HistoryTracker;
use super::settings::EngineSettings;
use crate::models::{EntityId, RoleId, Roster, Schedule};

// ============================================================================
// Sort Criteria
// ============================================================================

/// Primary ordering of the suggestion list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SortCriteria {
    /// Longest-unserved first
    #[default]
    LastAssignment,
    /// Display name, case-insensitive
    Alphabetical,
    /// Seeded shuffle; the same seed always gives the same order
    Shuffled { seed: u64 },
}

// ============================================================================
// Ranking
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub entity_id: EntityId,
    /// Date of the last service, `None` if never served
    pub last_served: Option<NaiveDate>,
    /// Days since the last service, `None` if never served
    pub days_since: Option<i64>,
    pub periods_since: Option<usize>,
    /// Served the same role within the configured minimum gap
    pub gap_violation: bool,
}

/// Why a ranking holds no candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoCandidateReason {
    /// Nobody on the roster is eligible for the role
    NoEligibleEntity,
    /// The period already sends out the maximum number of speakers
    ExternalSpeakerCapReached { cap: u32 },
}

/// Result of ranking one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Ranking {
    Candidates { candidates: Vec<RankedCandidate> },
    /// Rendered by the host as a disabled placeholder
    NoEligibleCandidate { reason: NoCandidateReason },
}

impl Ranking {
    pub fn candidates(&self) -> &[RankedCandidate] {
        match self {
            Self::Candidates { candidates } => candidates,
            Self::NoEligibleCandidate { .. } => &[],
        }
    }

    pub fn ids(&self) -> Vec<&EntityId> {
        self.candidates().iter().map(|c| &c.entity_id).collect()
    }

    pub fn first(&self) -> Option<&RankedCandidate> {
        self.candidates().first()
    }

    pub fn is_no_candidate(&self) -> bool {
        matches!(self, Self::NoEligibleCandidate { .. })
    }
}

// ============================================================================
// Candidate Ranker
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CandidateRanker<'a> {
    roster: &'a Roster,
    schedule: &'a Schedule,
    settings: &'a EngineSettings,
}

impl<'a> CandidateRanker<'a> {
    pub fn new(roster: &'a Roster, schedule: &'a Schedule, settings: &'a EngineSettings) -> Self {
        Self {
            roster,
            schedule,
            settings,
        }
    }

    /// Rank candidates for `role` in the period starting at `reference`
    ///
    /// # Arguments
    /// * `role` - Role of the slot being filled
    /// * `reference` - Start date of the period being filled
    /// * `slot_id` - The slot being filled, if known; it does not count
    ///   towards the external speaker cap
    pub fn rank(&self, role: RoleId, reference: NaiveDate, slot_id: Option<&str>) -> Ranking {
        if let Some(cap) = self.settings.interval.external_cap_reached(
            role,
            self.schedule.period(reference),
            slot_id,
        ) {
            debug!(role = %role, period = %reference, cap, "External speaker cap reached");
            return Ranking::NoEligibleCandidate {
                reason: NoCandidateReason::ExternalSpeakerCapReached { cap },
            };
        }

        let eligible = eligible_entities(role, self.roster);
        if eligible.is_empty() {
            debug!(role = %role, period = %reference, "No eligible candidate");
            return Ranking::NoEligibleCandidate {
                reason: NoCandidateReason::NoEligibleEntity,
            };
        }

        let tracker = HistoryTracker::build(self.schedule, reference);
        let history_roles = self.settings.history_roles(role);
        let interval = &self.settings.interval;

        let mut candidates: Vec<RankedCandidate> = eligible
            .into_iter()
            .map(|entity| {
                let recent = tracker.last_served(&entity, &history_roles);
                let same_role = tracker.last_served(&entity, &[role]);
                RankedCandidate {
                    entity_id: entity,
                    last_served: recent.map(|r| r.date),
                    days_since: tracker.days_since(recent),
                    periods_since: tracker.periods_since(recent),
                    gap_violation: interval
                        .violates_gap(role, tracker.periods_since(same_role)),
                }
            })
            .collect();

        self.order(&mut candidates);

        // Stable: violators keep their relative order at the tail
        candidates.sort_by_key(|c| c.gap_violation);

        debug!(
            role = %role,
            period = %reference,
            candidates = candidates.len(),
            demoted = candidates.iter().filter(|c| c.gap_violation).count(),
            "Ranked candidates"
        );

        Ranking::Candidates { candidates }
    }

    fn order(&self, candidates: &mut [RankedCandidate]) {
        match self.settings.sort_criteria {
            SortCriteria::LastAssignment => {
                candidates.sort_by(|a, b| longest_unserved_first(a.days_since, b.days_since));
            }
            SortCriteria::Alphabetical => {
                candidates.sort_by_cached_key(|c| {
                    self.roster
                        .display_name(&c.entity_id)
                        .unwrap_or_default()
                        .to_lowercase()
                });
            }
            SortCriteria::Shuffled { seed } => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                candidates.shuffle(&mut rng);
            }
        }
    }
}

/// `None` (never served) counts as infinitely long ago
fn longest_unserved_first(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(&a),
    }
}

/// Rank candidates for one slot with the given settings
pub fn rank_candidates(
    role: RoleId,
    reference: NaiveDate,
    schedule: &Schedule,
    roster: &Roster,
    settings: &EngineSettings,
) -> Ranking {
    CandidateRanker::new(roster, schedule, settings).rank(role, reference, None)
}

// ============================================================================
// Tests
// ============================================================================
