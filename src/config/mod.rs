//! Configuration management for duty-roster
//!
//! This module handles loading configuration from environment variables and
//! TOML files, and validating the engine knobs into [`EngineSettings`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use std::str::FromStr;

use crate::engine::{
    default_conflict_groups, ConflictGroup, EngineError, EngineResult, EngineSettings,
    GroupsPerEvent, HistoryScope, IntervalPolicy, MinimumGaps, SortCriteria,
};
use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Assignment engine knobs
    pub engine: EngineConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Engine knobs as the host stores them
///
/// Values are kept raw here so that a bad value surfaces as an
/// [`EngineError::InvalidConfiguration`] naming the field, rather than as a
/// parse error from the file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum weeks between two services of a meeting role
    pub min_gap_meeting: i64,

    /// Minimum weeks between two student parts
    pub min_gap_student: i64,

    /// Minimum weeks between two services of a support duty
    pub min_gap_service: i64,

    /// Minimum weeks between two public talks
    pub min_gap_public_talk: i64,

    /// Flag two members of one family in the same conflict group
    pub avoid_same_family_same_day: bool,

    /// External speakers allowed per week (`"none"` = uncapped)
    #[serde(
        serialize_with = "serialize_cap",
        deserialize_with = "deserialize_cap"
    )]
    pub max_external_speakers_per_period: Option<i64>,

    /// Cleaning groups per event: 1, 2 or 4
    pub groups_per_event: i64,

    /// Which past slots count as prior service
    pub history_scope: HistoryScope,

    /// Candidate ordering (last_assignment, alphabetical, shuffled)
    pub sort_criteria: String,

    /// Seed for the shuffled ordering
    pub shuffle_seed: Option<u64>,

    /// Conflict groups (absent = built-in groups)
    pub conflict_groups: Option<Vec<ConflictGroup>>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_gap_meeting: 2,
            min_gap_student: 4,
            min_gap_service: 2,
            min_gap_public_talk: 0,
            avoid_same_family_same_day: true,
            max_external_speakers_per_period: Some(1),
            groups_per_event: 1,
            history_scope: HistoryScope::Role,
            sort_criteria: String::from("last_assignment"),
            shuffle_seed: None,
            conflict_groups: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// Word lifting the external speaker cap, in files and environment alike
const UNCAPPED: &str = "none";

/// A cap as written by the operator: a count, or the word `none`
#[derive(Deserialize)]
#[serde(untagged)]
enum CapValue {
    Count(i64),
    Word(String),
}

fn serialize_cap<S>(cap: &Option<i64>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match cap {
        Some(count) => serializer.serialize_i64(*count),
        None => serializer.serialize_str(UNCAPPED),
    }
}

fn deserialize_cap<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match CapValue::deserialize(deserializer)? {
        CapValue::Count(count) => Ok(Some(count)),
        CapValue::Word(word) if word.trim().eq_ignore_ascii_case(UNCAPPED) => Ok(None),
        CapValue::Word(word) => Err(serde::de::Error::custom(format!(
            "expected a count or \"{UNCAPPED}\", got \"{word}\""
        ))),
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = EngineConfig::default();

        let max_external_speakers_per_period =
            match std::env::var("DUTY_ROSTER_MAX_EXTERNAL_SPEAKERS") {
                Ok(v) if v.trim().eq_ignore_ascii_case(UNCAPPED) => None,
                Ok(v) => v
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .or(defaults.max_external_speakers_per_period),
                Err(_) => defaults.max_external_speakers_per_period,
            };

        let history_scope = match std::env::var("DUTY_ROSTER_HISTORY_SCOPE").as_deref() {
            Ok("conflict_group") => HistoryScope::ConflictGroup,
            Ok("role") => HistoryScope::Role,
            _ => defaults.history_scope,
        };

        let engine = EngineConfig {
            min_gap_meeting: env_parse("DUTY_ROSTER_MIN_GAP_MEETING")
                .unwrap_or(defaults.min_gap_meeting),
            min_gap_student: env_parse("DUTY_ROSTER_MIN_GAP_STUDENT")
                .unwrap_or(defaults.min_gap_student),
            min_gap_service: env_parse("DUTY_ROSTER_MIN_GAP_SERVICE")
                .unwrap_or(defaults.min_gap_service),
            min_gap_public_talk: env_parse("DUTY_ROSTER_MIN_GAP_PUBLIC_TALK")
                .unwrap_or(defaults.min_gap_public_talk),
            avoid_same_family_same_day: env_parse("DUTY_ROSTER_AVOID_SAME_FAMILY")
                .unwrap_or(defaults.avoid_same_family_same_day),
            max_external_speakers_per_period,
            groups_per_event: env_parse("DUTY_ROSTER_GROUPS_PER_EVENT")
                .unwrap_or(defaults.groups_per_event),
            history_scope,
            sort_criteria: std::env::var("DUTY_ROSTER_SORT_CRITERIA")
                .unwrap_or(defaults.sort_criteria),
            shuffle_seed: env_parse("DUTY_ROSTER_SHUFFLE_SEED"),
            conflict_groups: None,
        };

        let logging = LoggingConfig {
            level: std::env::var("DUTY_ROSTER_LOG_LEVEL")
                .unwrap_or_else(|_| String::from("info")),
            format: std::env::var("DUTY_ROSTER_LOG_FORMAT")
                .unwrap_or_else(|_| String::from("text")),
        };

        Ok(Self { engine, logging })
    }

    /// Load configuration from a TOML file
    ///
    /// A missing or unreadable file is a storage error naming the path; a
    /// malformed file is a [`Error::Toml`] parse error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(format!("Failed to read config file: {}", path.display()), e)
        })?;

        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> EngineResult<()> {
        self.engine.settings().map(|_| ())?;

        match self.logging.format.as_str() {
            "text" | "pretty" | "json" => Ok(()),
            other => Err(EngineError::invalid_config(
                "logging.format",
                format!("unknown format '{other}', expected text or json"),
            )),
        }
    }
}

fn non_negative(field: &str, value: i64) -> EngineResult<u32> {
    u32::try_from(value).map_err(|_| {
        EngineError::invalid_config(field, format!("must be a non-negative count, got {value}"))
    })
}

impl EngineConfig {
    /// Check every knob and build the engine settings
    pub fn settings(&self) -> EngineResult<EngineSettings> {
        EngineSettings::try_from(self)
    }

    fn sort(&self) -> EngineResult<SortCriteria> {
        match self.sort_criteria.trim() {
            "last_assignment" => Ok(SortCriteria::LastAssignment),
            "alphabetical" => Ok(SortCriteria::Alphabetical),
            "shuffled" => self
                .shuffle_seed
                .map(|seed| SortCriteria::Shuffled { seed })
                .ok_or_else(|| {
                    EngineError::invalid_config("shuffle_seed", "required when sort_criteria is shuffled")
                }),
            other => Err(EngineError::invalid_config(
                "sort_criteria",
                format!("unknown ordering '{other}'"),
            )),
        }
    }

    fn groups(&self) -> EngineResult<Vec<ConflictGroup>> {
        let Some(groups) = &self.conflict_groups else {
            return Ok(default_conflict_groups());
        };

        for group in groups {
            if group.name.trim().is_empty() {
                return Err(EngineError::invalid_config(
                    "conflict_groups",
                    "group name must not be empty",
                ));
            }
            if group.roles.is_empty() {
                return Err(EngineError::invalid_config(
                    "conflict_groups",
                    format!("group '{}' has no roles", group.name),
                ));
            }
        }
        Ok(groups.clone())
    }
}

impl TryFrom<&EngineConfig> for EngineSettings {
    type Error = EngineError;

    fn try_from(config: &EngineConfig) -> EngineResult<Self> {
        let gaps = MinimumGaps {
            meeting: non_negative("min_gap_meeting", config.min_gap_meeting)?,
            student: non_negative("min_gap_student", config.min_gap_student)?,
            service: non_negative("min_gap_service", config.min_gap_service)?,
            public_talk: non_negative("min_gap_public_talk", config.min_gap_public_talk)?,
        };

        let mut interval = IntervalPolicy::new(gaps);
        if let Some(cap) = config.max_external_speakers_per_period {
            interval = interval
                .with_external_speaker_cap(non_negative("max_external_speakers_per_period", cap)?);
        }

        let groups_per_event = u8::try_from(config.groups_per_event)
            .map_err(|_| {
                EngineError::invalid_config(
                    "groups_per_event",
                    format!("must be 1, 2 or 4, got {}", config.groups_per_event),
                )
            })
            .and_then(GroupsPerEvent::try_from)?;

        Ok(Self {
            interval,
            avoid_same_family_same_day: config.avoid_same_family_same_day,
            groups_per_event,
            conflict_groups: config.groups()?,
            history_scope: config.history_scope,
            sort_criteria: config.sort()?,
        })
    }
}
