//! Conflict detection within one period
//!
//! A conflict group is a set of roles that must not share a person in the
//! same period (the speaker, chairman, reader and prayers of one meeting).
//! Findings are advisory; the host still commits the assignment.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::models::{EntityId, FamilyId, Period, RoleId, Roster};

// ============================================================================
// Conflict Group
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictGroup {
    pub name: String,
    pub roles: BTreeSet<RoleId>,
}

impl ConflictGroup {
    pub fn new(name: impl Into<String>, roles: impl IntoIterator<Item = RoleId>) -> Self {
        Self {
            name: name.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn contains(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }
}

/// Meeting parts in one group, floor services in another
pub fn default_conflict_groups() -> Vec<ConflictGroup> {
    vec![
        ConflictGroup::new(
            "meeting",
            [
                RoleId::Presiding,
                RoleId::OpeningPrayer,
                RoleId::ClosingPrayer,
                RoleId::BibleReading,
                RoleId::SpiritualGems,
                RoleId::StudentPart,
                RoleId::MinistryAssistant,
                RoleId::ChristianLifeTalk,
                RoleId::StudyConductor,
                RoleId::StudyReader,
                RoleId::PublicTalkSpeaker,
                RoleId::WatchtowerReader,
                RoleId::ExternalSpeaker,
            ],
        ),
        ConflictGroup::new(
            "services",
            [RoleId::SoundSystem, RoleId::Attendant, RoleId::Microphone],
        ),
    ]
}

// ============================================================================
// Conflict
// ============================================================================

/// What the conflicting slots have in common
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ConflictKey {
    Entity(EntityId),
    Family(FamilyId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Names of the conflict groups that flagged the key, in configured order
    pub groups: Vec<String>,
    pub key: ConflictKey,
    /// Sorted slot ids
    pub slot_ids: Vec<String>,
    /// Distinct entities involved, sorted
    pub entities: Vec<EntityId>,
}

impl Conflict {
    /// Fold a finding for the same key from another conflict group
    fn absorb(&mut self, group: &str, slot_ids: Vec<String>, entities: Vec<EntityId>) {
        if !self.groups.iter().any(|g| g == group) {
            self.groups.push(group.to_string());
        }
        self.slot_ids.extend(slot_ids);
        self.slot_ids.sort_unstable();
        self.slot_ids.dedup();
        self.entities.extend(entities);
        self.entities.sort();
        self.entities.dedup();
    }
}

// ============================================================================
// Conflict Detector
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ConflictDetector<'a> {
    groups: &'a [ConflictGroup],
    avoid_same_family: bool,
}

impl<'a> ConflictDetector<'a> {
    pub fn new(groups: &'a [ConflictGroup], avoid_same_family: bool) -> Self {
        Self {
            groups,
            avoid_same_family,
        }
    }

    /// Conflict groups containing `role`
    pub fn groups_for(&self, role: RoleId) -> impl Iterator<Item = &'a ConflictGroup> {
        let groups: &'a [ConflictGroup] = self.groups;
        groups.iter().filter(move |g| g.contains(role))
    }

    /// Every entity (and, when enabled, every family) holding more than one
    /// slot of the same conflict group in `period`
    ///
    /// Each key is reported once. When configured groups overlap, the slots
    /// and group names of every group that flags the key are merged.
    pub fn find_conflicts(&self, period: &Period, roster: &Roster) -> Vec<Conflict> {
        let mut merged: BTreeMap<ConflictKey, Conflict> = BTreeMap::new();
        let mut record = |group: &ConflictGroup,
                          key: ConflictKey,
                          slot_ids: Vec<String>,
                          entities: Vec<EntityId>| {
            merged
                .entry(key.clone())
                .or_insert_with(|| Conflict {
                    groups: Vec::new(),
                    key,
                    slot_ids: Vec::new(),
                    entities: Vec::new(),
                })
                .absorb(&group.name, slot_ids, entities);
        };

        for group in self.groups {
            let mut by_entity: BTreeMap<&EntityId, Vec<&str>> = BTreeMap::new();
            let mut by_family: BTreeMap<&FamilyId, Vec<(&str, &EntityId)>> = BTreeMap::new();

            for (slot, entity) in period.filled_slots().filter(|(s, _)| group.contains(s.role)) {
                by_entity.entry(entity).or_default().push(slot.id.as_str());

                if self.avoid_same_family {
                    if let Some(family) = roster.family_of(entity) {
                        by_family
                            .entry(family)
                            .or_default()
                            .push((slot.id.as_str(), entity));
                    }
                }
            }

            for (entity, mut slots) in by_entity {
                slots.sort_unstable();
                slots.dedup();
                if slots.len() > 1 {
                    record(
                        group,
                        ConflictKey::Entity(entity.clone()),
                        slots.into_iter().map(String::from).collect(),
                        vec![entity.clone()],
                    );
                }
            }

            for (family, held) in by_family {
                let entities: BTreeSet<&EntityId> = held.iter().map(|(_, e)| *e).collect();
                if entities.len() > 1 {
                    record(
                        group,
                        ConflictKey::Family(family.clone()),
                        held.iter().map(|(s, _)| s.to_string()).collect(),
                        entities.into_iter().cloned().collect(),
                    );
                }
            }
        }

        let conflicts: Vec<Conflict> = merged.into_values().collect();
        debug!(
            period = %period.start,
            conflicts = conflicts.len(),
            "Conflict check complete"
        );
        conflicts
    }

    /// Whether placing `candidate` into `slot_id` would create a conflict
    /// with the other slots already filled in `period`
    pub fn would_conflict(
        &self,
        period: &Period,
        slot_id: &str,
        candidate: &EntityId,
        roster: &Roster,
    ) -> bool {
        let Some(target) = period.slot(slot_id) else {
            return false;
        };
        let candidate_family = if self.avoid_same_family {
            roster.family_of(candidate)
        } else {
            None
        };

        self.groups_for(target.role).any(|group| {
            period
                .filled_slots()
                .filter(|(s, _)| s.id != slot_id && group.contains(s.role))
                .any(|(_, holder)| {
                    holder == candidate
                        || candidate_family.is_some_and(|family| {
                            roster.family_of(holder) == Some(family)
                        })
                })
        })
    }
}
