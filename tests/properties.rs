//! Property tests for ranking, conflicts and rotation

mod common;

use common::week;
use duty_roster::engine::{
    eligible_for, rank_candidates, ConflictDetector, ConflictKey, EngineSettings, GroupsPerEvent,
    IntervalPolicy, MinimumGaps, RotationPlanner,
};
use duty_roster::models::{
    EntityId, Gender, Group, Period, Person, RoleId, Roster, Schedule, Slot, SlotTemplate,
    SlotUpdate,
};
use proptest::prelude::*;
use std::collections::HashMap;

/// (capable, male, active) per person
fn people_strategy() -> impl Strategy<Value = Vec<(bool, bool, bool)>> {
    prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..8)
}

/// Reader per week, as an index into the roster
fn history_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(prop::option::of(0usize..8), 1..12)
}

fn build_roster(people: &[(bool, bool, bool)]) -> Roster {
    let people = people
        .iter()
        .enumerate()
        .map(|(i, &(capable, male, active))| {
            let mut person = Person::new(format!("p{i}"), format!("Person {i}"))
                .with_gender(if male { Gender::Male } else { Gender::Female });
            if capable {
                person = person.with_capability(RoleId::BibleReading);
            }
            if !active {
                person = person.inactive();
            }
            person
        })
        .collect();
    Roster::new(people, vec![])
}

fn build_schedule(history: &[Option<usize>], roster: &Roster) -> Schedule {
    let mut schedule = Schedule::generate(
        week(0),
        history.len() + 1,
        7,
        &[SlotTemplate::new("reader", RoleId::BibleReading)],
    )
    .unwrap();
    let updates: Vec<SlotUpdate> = history
        .iter()
        .enumerate()
        .filter_map(|(w, reader)| {
            let person = &roster.people[(*reader)? % roster.people.len()];
            Some(SlotUpdate::assign(week(w as i64), "reader", person.id.clone()))
        })
        .collect();
    schedule.apply(&updates).unwrap();
    schedule
}

fn cleaning_group(i: usize) -> Group {
    Group::new(format!("g{i}"), format!("Groupe {i}")).with_duty(RoleId::FacilityCleaning)
}

fn no_gaps() -> EngineSettings {
    EngineSettings {
        interval: IntervalPolicy::new(MinimumGaps::default()),
        ..EngineSettings::default()
    }
}

proptest! {
    /// Identical inputs always give the identical ordering
    #[test]
    fn ranking_is_deterministic(people in people_strategy(), history in history_strategy()) {
        let roster = build_roster(&people);
        let schedule = build_schedule(&history, &roster);
        let reference = week(history.len() as i64);
        let settings = EngineSettings::default();

        let first = rank_candidates(RoleId::BibleReading, reference, &schedule, &roster, &settings);
        let second = rank_candidates(RoleId::BibleReading, reference, &schedule, &roster, &settings);
        prop_assert_eq!(first, second);
    }

    /// No ineligible person is ever suggested
    #[test]
    fn ranking_respects_eligibility(people in people_strategy(), history in history_strategy()) {
        let roster = build_roster(&people);
        let schedule = build_schedule(&history, &roster);
        let ranking = rank_candidates(
            RoleId::BibleReading,
            week(history.len() as i64),
            &schedule,
            &roster,
            &EngineSettings::default(),
        );

        let expected = roster
            .people
            .iter()
            .filter(|p| eligible_for(RoleId::BibleReading, p))
            .count();
        prop_assert_eq!(ranking.candidates().len(), expected);
        prop_assert_eq!(ranking.is_no_candidate(), expected == 0);
        for id in ranking.ids() {
            let person = roster.person(id).unwrap();
            prop_assert!(eligible_for(RoleId::BibleReading, person));
        }
    }

    /// Never-served candidates come before anyone who has served
    #[test]
    fn never_served_ranks_first(people in people_strategy(), history in history_strategy()) {
        let roster = build_roster(&people);
        let schedule = build_schedule(&history, &roster);
        let ranking = rank_candidates(
            RoleId::BibleReading,
            week(history.len() as i64),
            &schedule,
            &roster,
            &no_gaps(),
        );

        let candidates = ranking.candidates();
        let first_served = candidates.iter().position(|c| c.last_served.is_some());
        if let Some(pos) = first_served {
            prop_assert!(candidates[pos..].iter().all(|c| c.last_served.is_some()));
        }
        for pair in candidates.windows(2) {
            if let (Some(a), Some(b)) = (pair[0].days_since, pair[1].days_since) {
                prop_assert!(a >= b);
            }
        }
    }

    /// One entity in two conflict-group slots is reported once, whatever the slot order
    #[test]
    fn conflict_reported_once(order in Just(vec![0usize, 1, 2, 3]).prop_shuffle()) {
        let layout = [
            Slot::new("presiding", RoleId::Presiding).with_assignee("x"),
            Slot::new("reader", RoleId::BibleReading).with_assignee("x"),
            Slot::new("prayer", RoleId::ClosingPrayer).with_assignee("y"),
            Slot::new("sound", RoleId::SoundSystem).with_assignee("x"),
        ];
        let slots = order.iter().map(|&i| layout[i].clone()).collect();
        let period = Period::new(week(0), slots);
        let settings = EngineSettings::default();

        let conflicts = ConflictDetector::new(&settings.conflict_groups, false)
            .find_conflicts(&period, &Roster::default());
        prop_assert_eq!(conflicts.len(), 1);
        prop_assert_eq!(&conflicts[0].key, &ConflictKey::Entity(EntityId::new("x")));
        prop_assert_eq!(&conflicts[0].slot_ids, &vec!["presiding".to_string(), "reader".to_string()]);
    }

    /// n groups over n periods: everyone serves exactly once
    #[test]
    fn rotation_covers_every_group(n in 1usize..12) {
        let groups: Vec<Group> = (0..n).map(cleaning_group).collect();
        let plan = RotationPlanner::new(GroupsPerEvent::One).plan(&groups, n).unwrap();

        let mut served: HashMap<&EntityId, usize> = HashMap::new();
        for period in &plan.periods {
            prop_assert_eq!(&period.sub_event_a, &period.sub_event_b);
            *served.entry(&period.sub_event_a[0]).or_default() += 1;
        }
        prop_assert_eq!(served.len(), n);
        prop_assert!(served.values().all(|&count| count == 1));
    }

    /// Planning [0..k) then [k..k+m) matches planning [0..k+m) at once
    #[test]
    fn rotation_resumes_exactly(
        n in 1usize..9,
        k in 0usize..10,
        m in 0usize..10,
        per_event in prop::sample::select(vec![1u8, 2, 4]),
    ) {
        let groups: Vec<Group> = (0..n).map(cleaning_group).collect();
        let per_event = GroupsPerEvent::try_from(per_event).unwrap();
        let planner = RotationPlanner::new(per_event);

        let whole = planner.plan(&groups, k + m).unwrap();
        let head = planner.plan(&groups, k).unwrap();
        let tail = planner.with_start_index(head.next_index).plan(&groups, m).unwrap();

        let split: Vec<_> = head
            .periods
            .iter()
            .chain(&tail.periods)
            .map(|p| (&p.sub_event_a, &p.sub_event_b))
            .collect();
        let joined: Vec<_> = whole
            .periods
            .iter()
            .map(|p| (&p.sub_event_a, &p.sub_event_b))
            .collect();
        prop_assert_eq!(split, joined);
        prop_assert_eq!(tail.next_index, whole.next_index);
    }
}
