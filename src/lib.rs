//! duty-roster - Weekly duty roster planner
//!
//! Fair, rule-checked assignment of a congregation's weekly duties: meeting
//! parts, support services and cleaning groups.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`] - Roster, roles, periods, slots and the schedule
//! - [`engine`] - Eligibility, ranking, conflicts, minimum gaps and rotation
//! - [`config`] - Configuration management and settings validation
//! - [`export`] - Export payload and workspace persistence
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use duty_roster::config::Config;
//! use duty_roster::engine::rank_candidates;
//! use duty_roster::export::Workspace;
//! use duty_roster::models::RoleId;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let settings = config.engine.settings()?;
//!     let workspace = Workspace::load_from_file("workspace.json").await?;
//!     let week = chrono::NaiveDate::from_ymd_opt(2024, 1, 8).unwrap_or_default();
//!
//!     let ranking = rank_candidates(
//!         RoleId::BibleReading,
//!         week,
//!         &workspace.schedule,
//!         &workspace.roster,
//!         &settings,
//!     );
//!     println!("{:?}", ranking.ids());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::engine::{
        auto_fill, rank_candidates, review_period, EngineError, EngineSettings, Finding, Ranking,
        RotationPlanner,
    };
    pub use crate::error::{Error, ErrorCategory, Result, RosterErrorTrait};
    pub use crate::export::{ScheduleExport, Workspace};
    pub use crate::models::{EntityId, Group, Person, RoleId, Roster, Schedule, SlotUpdate};
}

// Direct re-exports for convenience
pub use models::{EntityId, RoleId, Roster, Schedule};
