//! Tests for config module

use duty_roster::config::Config;
use duty_roster::engine::{EngineError, GroupsPerEvent, HistoryScope, SortCriteria};
use duty_roster::models::RoleId;
use serial_test::serial;
use std::io::Write;

const ENV_KEYS: &[&str] = &[
    "DUTY_ROSTER_MIN_GAP_MEETING",
    "DUTY_ROSTER_MIN_GAP_STUDENT",
    "DUTY_ROSTER_MIN_GAP_SERVICE",
    "DUTY_ROSTER_MIN_GAP_PUBLIC_TALK",
    "DUTY_ROSTER_AVOID_SAME_FAMILY",
    "DUTY_ROSTER_GROUPS_PER_EVENT",
    "DUTY_ROSTER_MAX_EXTERNAL_SPEAKERS",
    "DUTY_ROSTER_HISTORY_SCOPE",
    "DUTY_ROSTER_SORT_CRITERIA",
    "DUTY_ROSTER_SHUFFLE_SEED",
    "DUTY_ROSTER_LOG_LEVEL",
    "DUTY_ROSTER_LOG_FORMAT",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
fn test_config_file_exists() {
    let config_path = std::path::Path::new("config.toml");
    assert!(
        config_path.exists(),
        "config.toml should exist in project root"
    );
}

#[test]
fn test_shipped_config_is_valid() {
    let config = Config::from_file(std::path::Path::new("config.toml")).unwrap();
    assert!(config.validate().is_ok());

    let settings = config.engine.settings().unwrap();
    assert_eq!(settings.interval.gaps.student, 4);
    assert!(settings
        .conflict_groups
        .iter()
        .any(|g| g.contains(RoleId::Presiding)));
}

#[test]
fn test_from_file_full() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[engine]
min_gap_meeting = 3
min_gap_student = 6
groups_per_event = 2
history_scope = "conflict_group"
sort_criteria = "shuffled"
shuffle_seed = 42
avoid_same_family_same_day = false

[[engine.conflict_groups]]
name = "weekend"
roles = ["presiding", "watchtower_reader", "public_talk_speaker"]

[logging]
level = "debug"
format = "json"
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.logging.format, "json");

    let settings = config.engine.settings().unwrap();
    assert_eq!(settings.interval.gaps.meeting, 3);
    assert_eq!(settings.groups_per_event, GroupsPerEvent::Two);
    assert_eq!(settings.history_scope, HistoryScope::ConflictGroup);
    assert_eq!(settings.sort_criteria, SortCriteria::Shuffled { seed: 42 });
    assert!(!settings.avoid_same_family_same_day);
    assert_eq!(settings.conflict_groups.len(), 1);
    assert_eq!(settings.conflict_groups[0].name, "weekend");
}

#[test]
fn test_from_file_lifts_external_speaker_cap() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[engine]\nmin_gap_meeting = 2\nmax_external_speakers_per_period = \"none\""
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.engine.max_external_speakers_per_period, None);
    assert_eq!(config.engine.settings().unwrap().interval.max_external_speakers, None);
}

#[test]
fn test_from_file_invalid_groups_per_event() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[engine]\ngroups_per_event = 3").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidConfiguration { ref field, .. } if field == "groups_per_event"
    ));
}

#[test]
fn test_from_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_file(&dir.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    let config = Config::from_env().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    std::env::set_var("DUTY_ROSTER_MIN_GAP_MEETING", "5");
    std::env::set_var("DUTY_ROSTER_GROUPS_PER_EVENT", "4");
    std::env::set_var("DUTY_ROSTER_MAX_EXTERNAL_SPEAKERS", "none");
    std::env::set_var("DUTY_ROSTER_HISTORY_SCOPE", "conflict_group");
    std::env::set_var("DUTY_ROSTER_LOG_LEVEL", "debug");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.engine.min_gap_meeting, 5);
    assert_eq!(config.engine.groups_per_event, 4);
    assert_eq!(config.engine.max_external_speakers_per_period, None);
    assert_eq!(config.engine.history_scope, HistoryScope::ConflictGroup);
    assert_eq!(config.logging.level, "debug");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_unparsable_falls_back() {
    clear_env();
    std::env::set_var("DUTY_ROSTER_MIN_GAP_STUDENT", "four");
    std::env::set_var("DUTY_ROSTER_MIN_GAP_MEETING", "-1");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.engine.min_gap_student, 4);
    // parsable but out of domain: kept, then rejected by validation
    assert_eq!(config.engine.min_gap_meeting, -1);
    assert!(config.validate().is_err());
}
