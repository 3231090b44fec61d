//! Common test utilities

use chrono::{Duration, NaiveDate};
use duty_roster::models::{
    Family, Gender, Group, Person, RoleId, Roster, Schedule, SlotTemplate, SubEvent,
};

/// Monday of the first test week
pub fn week(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default() + Duration::weeks(n)
}

/// Create an active brother with the given capabilities
pub fn brother(id: &str, name: &str, roles: &[RoleId]) -> Person {
    Person::new(id, name)
        .with_gender(Gender::Male)
        .with_capabilities(roles.iter().copied())
}

/// Create an active sister with the given capabilities
pub fn sister(id: &str, name: &str, roles: &[RoleId]) -> Person {
    Person::new(id, name)
        .with_gender(Gender::Female)
        .with_capabilities(roles.iter().copied())
}

/// Slot layout of a typical week
pub fn weekly_template() -> Vec<SlotTemplate> {
    vec![
        SlotTemplate::new("presiding", RoleId::Presiding),
        SlotTemplate::new("opening_prayer", RoleId::OpeningPrayer),
        SlotTemplate::new("reader", RoleId::BibleReading),
        SlotTemplate::new("student.1", RoleId::StudentPart),
        SlotTemplate::new("closing_prayer", RoleId::ClosingPrayer),
        SlotTemplate::new("sound", RoleId::SoundSystem),
        SlotTemplate::new("mic.1", RoleId::Microphone),
        SlotTemplate::new("mic.2", RoleId::Microphone),
        SlotTemplate::new("cleaning.a", RoleId::FacilityCleaning).for_sub_event(SubEvent::A),
        SlotTemplate::new("cleaning.b", RoleId::FacilityCleaning).for_sub_event(SubEvent::B),
    ]
}

/// Create a small congregation roster
pub fn congregation() -> Roster {
    let meeting = [
        RoleId::Presiding,
        RoleId::OpeningPrayer,
        RoleId::ClosingPrayer,
        RoleId::BibleReading,
    ];

    Roster::new(
        vec![
            brother("p-martin", "Pierre Martin", &meeting).with_family("f-martin"),
            brother("j-bernard", "Jean Bernard", &[RoleId::BibleReading, RoleId::ClosingPrayer]),
            brother("l-petit", "Luc Petit", &[RoleId::BibleReading, RoleId::SoundSystem]),
            brother("m-roux", "Marc Roux", &[RoleId::SoundSystem, RoleId::Microphone]),
            brother("t-martin", "Thomas Martin", &[RoleId::Microphone, RoleId::OpeningPrayer])
                .with_family("f-martin"),
            sister("c-martin", "Claire Martin", &[RoleId::StudentPart]).with_family("f-martin"),
            sister("a-durand", "Anne Durand", &[RoleId::StudentPart, RoleId::Microphone]),
            brother("old", "Henri Vieux", &[RoleId::BibleReading]).inactive(),
        ],
        vec![
            Group::new("g1", "Groupe 1").with_duty(RoleId::FacilityCleaning),
            Group::new("g2", "Groupe 2").with_duty(RoleId::FacilityCleaning),
            Group::new("g3", "Groupe 3").with_duty(RoleId::FacilityCleaning),
            Group::new("g4", "Groupe 4")
                .with_duty(RoleId::FacilityCleaning)
                .inactive(),
        ],
    )
    .with_family(Family::new("f-martin", "Famille Martin"))
    .with_family(Family::new("f-durand", "Famille Durand"))
    .with_family(Family::new("f-gone", "Famille Partie").inactive())
}

/// Eight empty weeks with the standard layout
#[allow(dead_code)]
pub fn empty_schedule() -> Schedule {
    Schedule::generate(week(0), 8, 7, &weekly_template()).unwrap_or_default()
}
