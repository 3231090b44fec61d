pub mod export;
pub mod plan;
pub mod rotate;

// Re-export command functions for convenience
pub use export::export;
pub use plan::{conflicts, rank, review};
pub use rotate::{autofill, rotate};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use duty_roster::config::Config;
use duty_roster::engine::EngineSettings;
use duty_roster::export::Workspace;
use duty_roster::models::{EntityId, Roster, SlotUpdate};

/// A loaded workspace together with the validated engine settings
pub struct Session {
    pub path: PathBuf,
    pub workspace: Workspace,
    pub settings: EngineSettings,
}

impl Session {
    pub async fn open(path: &Path, config: &Config) -> Result<Self> {
        let settings = config
            .engine
            .settings()
            .context("Invalid engine configuration")?;
        let workspace = Workspace::load_from_file(path)
            .await
            .with_context(|| format!("Failed to load workspace: {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            workspace,
            settings,
        })
    }

    pub async fn save(&self) -> Result<()> {
        self.workspace
            .save_to_file(&self.path)
            .await
            .with_context(|| format!("Failed to save workspace: {}", self.path.display()))
    }
}

pub(crate) fn name_of(roster: &Roster, id: &EntityId) -> String {
    roster
        .display_name(id)
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string())
}

pub(crate) fn print_updates(roster: &Roster, updates: &[SlotUpdate]) {
    if updates.is_empty() {
        println!("Nothing to change.");
        return;
    }

    let mut current = None;
    for update in updates {
        if current != Some(update.period) {
            println!("\nWeek of {}", update.period);
            current = Some(update.period);
        }
        match &update.assignee {
            Some(id) => println!("  {:<20} {}", update.slot_id, name_of(roster, id)),
            None => println!("  {:<20} (cleared)", update.slot_id),
        }
    }
}
