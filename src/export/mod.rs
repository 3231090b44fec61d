//! Schedule export and workspace persistence
//!
//! - [`ScheduleExport`] - the per-week payload handed to the companion app
//! - [`workspace`] - the JSON file holding roster and schedule together

pub mod workspace;

pub use workspace::Workspace;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::models::{EntityId, Period, RoleId, Roster, Schedule};

/// One filled slot as the companion app sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedAssignment {
    pub role: RoleId,
    pub entity_id: EntityId,
    /// Display name at export time, or the raw id when the roster lost it
    pub name: String,
}

/// One week of finalized assignments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedPeriod {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Slot id → assignment; empty slots are omitted
    pub assignments: BTreeMap<String, ExportedAssignment>,
}

impl ExportedPeriod {
    fn from_period(period: &Period, roster: &Roster) -> Self {
        let assignments = period
            .filled_slots()
            .map(|(slot, entity)| {
                let name = roster
                    .display_name(entity)
                    .map(str::to_string)
                    .unwrap_or_else(|| entity.to_string());
                (
                    slot.id.clone(),
                    ExportedAssignment {
                        role: slot.role,
                        entity_id: entity.clone(),
                        name,
                    },
                )
            })
            .collect();

        Self {
            week_start: period.start,
            week_end: period.start + Duration::days(6),
            label: period.label.clone(),
            assignments,
        }
    }
}

/// Export payload for a date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExport {
    pub generated_at: DateTime<Utc>,
    pub periods: Vec<ExportedPeriod>,
}

impl ScheduleExport {
    /// Export every period whose start falls in `from..=to`
    pub fn build(schedule: &Schedule, roster: &Roster, from: NaiveDate, to: NaiveDate) -> Self {
        let periods = schedule
            .periods_from(from)
            .iter()
            .take_while(|p| p.start <= to)
            .map(|p| ExportedPeriod::from_period(p, roster))
            .collect::<Vec<_>>();

        tracing::debug!(%from, %to, periods = periods.len(), "Built schedule export");

        Self {
            generated_at: Utc::now(),
            periods,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Save to file
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        tokio::fs::write(path.as_ref(), json).await?;
        Ok(())
    }
}
