//! Validated engine settings
//!
//! Built from the flat configuration knobs by
//! [`crate::config::EngineConfig::settings`]; every engine call takes a
//! reference to one of these and never stores it.

use super::conflict::{default_conflict_groups, ConflictGroup};
use super::history::HistoryScope;
use super::policy::{IntervalPolicy, MinimumGaps};
use super::ranker::SortCriteria;
use super::rotation::GroupsPerEvent;
use crate::models::RoleId;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub interval: IntervalPolicy,
    pub avoid_same_family_same_day: bool,
    pub groups_per_event: GroupsPerEvent,
    pub conflict_groups: Vec<ConflictGroup>,
    pub history_scope: HistoryScope,
    pub sort_criteria: SortCriteria,
}

impl EngineSettings {
    /// Roles whose past slots count as prior service of `role`
    pub fn history_roles(&self, role: RoleId) -> Vec<RoleId> {
        let mut roles = vec![role];
        if self.history_scope == HistoryScope::ConflictGroup {
            for group in self.conflict_groups.iter().filter(|g| g.contains(role)) {
                roles.extend(group.roles.iter().copied());
            }
            roles.sort_unstable();
            roles.dedup();
        }
        roles
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            interval: IntervalPolicy::new(MinimumGaps {
                meeting: 2,
                student: 4,
                service: 2,
                public_talk: 0,
            })
            .with_external_speaker_cap(1),
            avoid_same_family_same_day: true,
            groups_per_event: GroupsPerEvent::One,
            conflict_groups: default_conflict_groups(),
            history_scope: HistoryScope::Role,
            sort_criteria: SortCriteria::LastAssignment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_roles_default_scope() {
        let settings = EngineSettings::default();
        assert_eq!(settings.history_roles(RoleId::BibleReading), vec![RoleId::BibleReading]);
    }

    #[test]
    fn test_history_roles_conflict_group_scope() {
        let settings = EngineSettings {
            history_scope: HistoryScope::ConflictGroup,
            conflict_groups: vec![ConflictGroup::new(
                "weekend",
                [RoleId::Presiding, RoleId::WatchtowerReader],
            )],
            ..EngineSettings::default()
        };

        assert_eq!(
            settings.history_roles(RoleId::WatchtowerReader),
            vec![RoleId::Presiding, RoleId::WatchtowerReader]
        );
        assert_eq!(settings.history_roles(RoleId::SoundSystem), vec![RoleId::SoundSystem]);
    }
}
