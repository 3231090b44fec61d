//! Interval policy
//!
//! Minimum gaps between two services of the same entity in the same role,
//! and the per-period cap on speakers sent to other congregations.

use serde::{Deserialize, Serialize};

use crate::models::{Period, RoleId};

/// Duty category a minimum gap is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyCategory {
    /// Meeting parts given by appointed brothers
    Meeting,
    /// Student assignments
    Student,
    /// Floor services and group duties
    Service,
    /// Public talks, local or external
    PublicTalk,
}

impl DutyCategory {
    pub fn for_role(role: RoleId) -> Self {
        match role {
            RoleId::StudentPart | RoleId::MinistryAssistant => Self::Student,
            RoleId::PublicTalkSpeaker | RoleId::ExternalSpeaker => Self::PublicTalk,
            RoleId::SoundSystem
            | RoleId::Attendant
            | RoleId::Microphone
            | RoleId::Hospitality
            | RoleId::FacilityCleaning
            | RoleId::GroundsUpkeep => Self::Service,
            _ => Self::Meeting,
        }
    }
}

/// Minimum number of periods between two services, per category; 0 disables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MinimumGaps {
    pub meeting: u32,
    pub student: u32,
    pub service: u32,
    pub public_talk: u32,
}

impl MinimumGaps {
    pub fn for_category(&self, category: DutyCategory) -> u32 {
        match category {
            DutyCategory::Meeting => self.meeting,
            DutyCategory::Student => self.student,
            DutyCategory::Service => self.service,
            DutyCategory::PublicTalk => self.public_talk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntervalPolicy {
    pub gaps: MinimumGaps,
    /// `None` leaves external speakers uncapped
    pub max_external_speakers: Option<u32>,
}

impl IntervalPolicy {
    pub fn new(gaps: MinimumGaps) -> Self {
        Self {
            gaps,
            max_external_speakers: None,
        }
    }

    pub fn with_external_speaker_cap(mut self, cap: u32) -> Self {
        self.max_external_speakers = Some(cap);
        self
    }

    pub fn min_gap(&self, role: RoleId) -> u32 {
        self.gaps.for_category(DutyCategory::for_role(role))
    }

    /// Whether serving again after `periods_since` periods is too soon
    pub fn violates_gap(&self, role: RoleId, periods_since: Option<usize>) -> bool {
        let gap = self.min_gap(role) as usize;
        gap > 0 && periods_since.is_some_and(|elapsed| elapsed < gap)
    }

    /// Whether `period` already holds as many external speakers as allowed.
    /// The slot being ranked, if any, does not count towards the cap.
    pub fn external_cap_reached(
        &self,
        role: RoleId,
        period: Option<&Period>,
        ranked_slot: Option<&str>,
    ) -> Option<u32> {
        if role != RoleId::ExternalSpeaker {
            return None;
        }
        let cap = self.max_external_speakers?;
        let assigned = period.map_or(0, |p| {
            p.filled_slots()
                .filter(|(s, _)| s.role == RoleId::ExternalSpeaker)
                .filter(|(s, _)| Some(s.id.as_str()) != ranked_slot)
                .count()
        });

        (assigned >= cap as usize).then_some(cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Slot;
    use chrono::NaiveDate;

    fn policy() -> IntervalPolicy {
        IntervalPolicy::new(MinimumGaps {
            meeting: 2,
            student: 4,
            service: 0,
            public_talk: 0,
        })
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(DutyCategory::for_role(RoleId::StudentPart), DutyCategory::Student);
        assert_eq!(
            DutyCategory::for_role(RoleId::MinistryAssistant),
            DutyCategory::Student
        );
        assert_eq!(
            DutyCategory::for_role(RoleId::ChristianLifeTalk),
            DutyCategory::Meeting
        );
        assert_eq!(DutyCategory::for_role(RoleId::Hospitality), DutyCategory::Service);
        assert_eq!(DutyCategory::for_role(RoleId::BibleReading), DutyCategory::Meeting);
        assert_eq!(DutyCategory::for_role(RoleId::Microphone), DutyCategory::Service);
        assert_eq!(
            DutyCategory::for_role(RoleId::ExternalSpeaker),
            DutyCategory::PublicTalk
        );
    }

    #[test]
    fn test_violates_gap() {
        let policy = policy();
        assert!(policy.violates_gap(RoleId::StudentPart, Some(2)));
        assert!(policy.violates_gap(RoleId::StudentPart, Some(3)));
        assert!(!policy.violates_gap(RoleId::StudentPart, Some(4)));
        assert!(!policy.violates_gap(RoleId::StudentPart, None));
    }

    #[test]
    fn test_zero_gap_disables() {
        let policy = policy();
        assert!(!policy.violates_gap(RoleId::SoundSystem, Some(1)));
    }

    #[test]
    fn test_external_cap() {
        let policy = policy().with_external_speaker_cap(1);
        let period = Period::new(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            vec![
                Slot::new("out1", RoleId::ExternalSpeaker).with_assignee("p1"),
                Slot::new("out2", RoleId::ExternalSpeaker),
            ],
        );

        assert_eq!(
            policy.external_cap_reached(RoleId::ExternalSpeaker, Some(&period), Some("out2")),
            Some(1)
        );
        // re-ranking the filled slot itself leaves room
        assert_eq!(
            policy.external_cap_reached(RoleId::ExternalSpeaker, Some(&period), Some("out1")),
            None
        );
        assert_eq!(
            policy.external_cap_reached(RoleId::PublicTalkSpeaker, Some(&period), None),
            None
        );
    }

    #[test]
    fn test_external_cap_absent() {
        let period = Period::new(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            vec![Slot::new("out1", RoleId::ExternalSpeaker).with_assignee("p1")],
        );
        assert_eq!(
            policy().external_cap_reached(RoleId::ExternalSpeaker, Some(&period), None),
            None
        );
    }
}
