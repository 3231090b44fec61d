//! Error types for the assignment engine
//!
//! Only structurally invalid input is an error. "No candidate", conflicts and
//! cooldown violations are ordinary results, see [`crate::engine::ranker::Ranking`]
//! and [`crate::engine::review::Finding`].

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::RoleId;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Batch rotation was requested with an empty group list
    ///
    /// `role` is known when the groups came from the roster.
    #[error("No groups available for rotation{}", role_suffix(.role))]
    NoGroupsAvailable { role: Option<RoleId> },

    /// Pool rotation was requested with nobody eligible
    #[error("No eligible people available to rotate for role '{role}'")]
    EmptyRotationPool { role: String },

    /// A configuration value outside its valid domain
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Unknown role identifier
    #[error("Unknown role '{id}'")]
    UnknownRole { id: String },

    /// Two periods share the same start date
    #[error("Duplicate period date: {date}")]
    DuplicatePeriod { date: NaiveDate },

    /// Period dates are not strictly increasing
    #[error("Period {next} is listed after {previous}")]
    UnorderedPeriods {
        previous: NaiveDate,
        next: NaiveDate,
    },

    /// No period starts on the given date
    #[error("Period not found for date: {date}")]
    PeriodNotFound { date: NaiveDate },

    /// The period has no slot with this id
    #[error("Slot '{slot}' not found in period {date}")]
    SlotNotFound { date: NaiveDate, slot: String },

    /// A batch operation needs more periods than the schedule holds
    #[error("Schedule too short: {needed} periods needed from {from}, {available} available")]
    ScheduleTooShort {
        from: NaiveDate,
        needed: usize,
        available: usize,
    },
}

fn role_suffix(role: &Option<RoleId>) -> String {
    role.map(|r| format!(" of role '{r}'")).unwrap_or_default()
}

impl EngineError {
    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an empty rotation pool error
    pub fn empty_pool(role: impl ToString) -> Self {
        Self::EmptyRotationPool {
            role: role.to_string(),
        }
    }

    /// Get French description for operator-facing messages
    pub fn french_desc(&self) -> String {
        match self {
            Self::NoGroupsAvailable { role: None } => {
                "Aucun groupe disponible pour la rotation".to_string()
            }
            Self::NoGroupsAvailable { role: Some(role) } => format!(
                "Aucun groupe disponible pour la rotation de « {} »",
                role.french_label()
            ),
            Self::EmptyRotationPool { role } => {
                format!("Aucune personne disponible pour le rôle '{}'", role)
            }
            Self::InvalidConfiguration { field, reason } => {
                format!("Paramètre invalide ({}): {}", field, reason)
            }
            Self::UnknownRole { id } => format!("Rôle inconnu: '{}'", id),
            Self::DuplicatePeriod { date } => format!("Semaine en double: {}", date),
            Self::UnorderedPeriods { previous, next } => {
                format!("Semaine {} placée après {}", next, previous)
            }
            Self::PeriodNotFound { date } => format!("Semaine introuvable: {}", date),
            Self::SlotNotFound { date, slot } => {
                format!("Emplacement '{}' introuvable pour la semaine {}", slot, date)
            }
            Self::ScheduleTooShort {
                needed, available, ..
            } => format!(
                "Programme trop court: {} semaines nécessaires, {} disponibles",
                needed, available
            ),
        }
    }

    /// Check if the operator can fix the input and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoGroupsAvailable { .. }
                | Self::EmptyRotationPool { .. }
                | Self::PeriodNotFound { .. }
                | Self::SlotNotFound { .. }
                | Self::ScheduleTooShort { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_error() {
        let err = EngineError::invalid_config("groups_per_event", "must be 1, 2 or 4");
        assert!(err.to_string().contains("groups_per_event"));
        assert!(err.to_string().contains("1, 2 or 4"));
    }

    #[test]
    fn test_french_desc() {
        let err = EngineError::NoGroupsAvailable { role: None };
        assert!(err.french_desc().contains("Aucun groupe"));
    }

    #[test]
    fn test_no_groups_names_role() {
        let err = EngineError::NoGroupsAvailable {
            role: Some(RoleId::FacilityCleaning),
        };
        assert_eq!(
            err.to_string(),
            format!("No groups available for rotation of role '{}'", RoleId::FacilityCleaning)
        );
        assert!(err.french_desc().contains(RoleId::FacilityCleaning.french_label()));

        let anonymous = EngineError::NoGroupsAvailable { role: None };
        assert_eq!(anonymous.to_string(), "No groups available for rotation");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(EngineError::NoGroupsAvailable { role: None }.is_recoverable());
        assert!(!EngineError::invalid_config("min_gap_meeting", "negative").is_recoverable());
    }
}
