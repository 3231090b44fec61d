//! History tracker
//!
//! Derives, for one reference date, the most recent period in which each
//! entity served each role. Only periods strictly before the reference date
//! are read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{EntityId, RoleId, Schedule};

/// Which past slots count as "having served" a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryScope {
    /// Only slots of the same role
    #[default]
    Role,
    /// Any slot of a role sharing a conflict group with it
    ConflictGroup,
}

/// Most recent service of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceRecord {
    pub date: NaiveDate,
    /// Index of the period in the schedule
    pub period_index: usize,
}

/// Last-service index for one reference date
#[derive(Debug)]
pub struct HistoryTracker<'a> {
    reference: NaiveDate,
    periods_before: usize,
    last: HashMap<(RoleId, &'a EntityId), ServiceRecord>,
}

impl<'a> HistoryTracker<'a> {
    /// Index every assignment made before `reference`
    pub fn build(schedule: &'a Schedule, reference: NaiveDate) -> Self {
        let past = schedule.periods_before(reference);
        let mut last = HashMap::new();

        // Periods are ordered, so later inserts win
        for (period_index, period) in past.iter().enumerate() {
            for (slot, entity) in period.filled_slots() {
                last.insert(
                    (slot.role, entity),
                    ServiceRecord {
                        date: period.start,
                        period_index,
                    },
                );
            }
        }

        Self {
            reference,
            periods_before: past.len(),
            last,
        }
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    /// Most recent service of `entity` in any of `roles`
    pub fn last_served(&self, entity: &EntityId, roles: &[RoleId]) -> Option<ServiceRecord> {
        roles
            .iter()
            .filter_map(|role| self.last.get(&(*role, entity)).copied())
            .max_by_key(|record| record.period_index)
    }

    /// Days between the last service and the reference date; `None` means never
    pub fn days_since(&self, record: Option<ServiceRecord>) -> Option<i64> {
        record.map(|r| (self.reference - r.date).num_days())
    }

    /// Periods elapsed since the last service; served in the previous period is 1
    pub fn periods_since(&self, record: Option<ServiceRecord>) -> Option<usize> {
        record.map(|r| self.periods_before - r.period_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SlotTemplate, SlotUpdate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule() -> Schedule {
        let template = vec![
            SlotTemplate::new("reader", RoleId::BibleReading),
            SlotTemplate::new("prayer", RoleId::OpeningPrayer),
        ];
        let mut schedule = Schedule::generate(date(2024, 1, 1), 6, 7, &template).unwrap();
        schedule
            .apply(&[
                SlotUpdate::assign(date(2024, 1, 1), "reader", "p1".into()),
                SlotUpdate::assign(date(2024, 1, 15), "reader", "p1".into()),
                SlotUpdate::assign(date(2024, 1, 22), "prayer", "p1".into()),
                SlotUpdate::assign(date(2024, 2, 5), "reader", "p2".into()),
            ])
            .unwrap();
        schedule
    }

    #[test]
    fn test_most_recent_service() {
        let schedule = schedule();
        let tracker = HistoryTracker::build(&schedule, date(2024, 1, 29));
        let p1 = EntityId::new("p1");

        let record = tracker.last_served(&p1, &[RoleId::BibleReading]).unwrap();
        assert_eq!(record.date, date(2024, 1, 15));
        assert_eq!(tracker.days_since(Some(record)), Some(14));
        assert_eq!(tracker.periods_since(Some(record)), Some(2));
    }

    #[test]
    fn test_no_look_ahead() {
        let schedule = schedule();
        let tracker = HistoryTracker::build(&schedule, date(2024, 2, 5));

        // p2 reads on the reference week itself, which does not count
        assert!(tracker
            .last_served(&"p2".into(), &[RoleId::BibleReading])
            .is_none());
    }

    #[test]
    fn test_multiple_roles() {
        let schedule = schedule();
        let tracker = HistoryTracker::build(&schedule, date(2024, 2, 5));

        let record = tracker
            .last_served(&"p1".into(), &[RoleId::BibleReading, RoleId::OpeningPrayer])
            .unwrap();
        assert_eq!(record.date, date(2024, 1, 22));
    }

    #[test]
    fn test_never_served() {
        let schedule = schedule();
        let tracker = HistoryTracker::build(&schedule, date(2024, 2, 5));
        let record = tracker.last_served(&"nobody".into(), &[RoleId::BibleReading]);

        assert_eq!(tracker.days_since(record), None);
        assert_eq!(tracker.periods_since(record), None);
    }

    #[test]
    fn test_reference_outside_schedule() {
        let schedule = schedule();
        let tracker = HistoryTracker::build(&schedule, date(2024, 3, 4));
        let record = tracker.last_served(&"p2".into(), &[RoleId::BibleReading]);

        // six periods precede the reference, p2 read in the last of them
        assert_eq!(tracker.periods_since(record), Some(1));
    }
}
