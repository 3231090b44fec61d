//! Workspace file: roster, schedule and rotation cursors in one JSON document

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{RoleId, Roster, Schedule};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub roster: Roster,
    #[serde(default)]
    pub schedule: Schedule,
    /// Next group index per rotated role, so the following batch resumes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rotation_state: BTreeMap<RoleId, usize>,
}

impl Workspace {
    pub fn new(roster: Roster, schedule: Schedule) -> Self {
        Self {
            roster,
            schedule,
            rotation_state: BTreeMap::new(),
        }
    }

    /// Where the next rotation of `role` starts
    pub fn rotation_start(&self, role: RoleId) -> usize {
        self.rotation_state.get(&role).copied().unwrap_or_default()
    }

    /// Deserialize from JSON
    ///
    /// Period dates are checked on load, so a hand-edited file with duplicate
    /// or unordered weeks is rejected here.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Load from file
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path.as_ref()).await?;
        let workspace = Self::from_json(&json)?;
        debug!(
            path = %path.as_ref().display(),
            people = workspace.roster.people.len(),
            groups = workspace.roster.groups.len(),
            periods = workspace.schedule.len(),
            "Loaded workspace"
        );
        Ok(workspace)
    }

    /// Save to file
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        tokio::fs::write(path.as_ref(), json).await?;
        info!(path = %path.as_ref().display(), "Saved workspace");
        Ok(())
    }
}
