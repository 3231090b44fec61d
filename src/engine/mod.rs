//! Duty assignment engine
//!
//! Pure scheduling logic for a congregation's weekly duty roster: who may fill
//! a role, who has waited longest, which assignments clash, and how cleaning
//! groups rotate across weeks. Nothing in this module performs I/O; callers
//! hand in the roster, the schedule and the settings and get plain values back.
//!
//! # Overview
//!
//! The engine is advisory. It ranks candidates and reports problems, but the
//! operator always has the final word: any assignment may be recorded, and
//! [`review::review_period`] flags it afterwards if it breaks a rule.
//!
//! # Features
//!
//! - **Eligibility**: capability and gender rules per role
//! - **Fair rotation**: longest-unserved first, never-served before everyone
//! - **Minimum gaps**: recent servers are demoted, never excluded
//! - **Conflict detection**: one person per conflict group per week, optional
//!   same-family check
//! - **Group rotation**: resumable round-robin of cleaning groups, 1, 2 or 4
//!   groups per event
//! - **Auto-fill**: greedy fill of empty person slots without backtracking
//!
//! # Modules
//!
//! - [`eligibility`] - Role qualification rules
//! - [`history`] - Prior-service lookup, strictly before a reference date
//! - [`ranker`] - Candidate ordering and the no-candidate sentinel
//! - [`policy`] - Minimum gaps and the external speaker cap
//! - [`conflict`] - Conflict groups and same-week clash detection
//! - [`rotation`] - Group and pool rotation plans
//! - [`autofill`] - Greedy multi-period fill
//! - [`review`] - Advisory findings for one period
//! - [`settings`] - Validated engine settings
//! - [`error`] - Engine error type
//!
//! # Quick Start
//!
//! ```ignore
//! use duty_roster::engine::{rank_candidates, EngineSettings, Ranking};
//! use duty_roster::models::RoleId;
//!
//! let settings = EngineSettings::default();
//! match rank_candidates(RoleId::BibleReading, week, &schedule, &roster, &settings) {
//!     Ranking::Candidates { candidates } => {
//!         for c in &candidates {
//!             println!("{} ({:?} weeks)", c.entity_id, c.periods_since);
//!         }
//!     }
//!     Ranking::NoEligibleCandidate { reason } => println!("nobody: {:?}", reason),
//! }
//! ```
//!
//! # Default Minimum Gaps
//!
//! | Category | Weeks | Roles |
//! |----------|-------|-------|
//! | Meeting | 2 | presiding, prayers, readings, Christian-life talks, study |
//! | Student | 4 | student parts, householders |
//! | Service | 2 | sound, attendants, microphones, hospitality |
//! | Public talk | 0 | speakers |

pub mod autofill;
pub mod conflict;
pub mod eligibility;
pub mod error;
pub mod history;
pub mod policy;
pub mod ranker;
pub mod review;
pub mod rotation;
pub mod settings;

// Re-export main types
pub use autofill::auto_fill;
pub use conflict::{default_conflict_groups, Conflict, ConflictDetector, ConflictGroup, ConflictKey};
pub use eligibility::{
    eligible_entities, eligible_for, eligible_groups, family_eligible_for, group_eligible_for,
    is_entity_eligible, GenderRule,
};
pub use error::{EngineError, EngineResult};
pub use history::{HistoryScope, HistoryTracker, ServiceRecord};
pub use policy::{DutyCategory, IntervalPolicy, MinimumGaps};
pub use ranker::{
    rank_candidates, CandidateRanker, NoCandidateReason, RankedCandidate, Ranking, SortCriteria,
};
pub use review::{review_period, Finding};
pub use rotation::{
    next_pool_offset, plan_pool_rotation, plan_rotation, pool_rotation_updates, GroupsPerEvent,
    PeriodRotation, RotationPlan, RotationPlanner,
};
pub use settings::EngineSettings;
