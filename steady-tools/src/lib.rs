//! steady-tools: screener scoring, the goal lifecycle and plan sharing

pub mod asrs;
pub mod audit;
pub mod goals;
pub mod share;

pub use asrs::{AsrsResult, score_asrs};
pub use audit::{AuditResult, RiskZone, score_audit};
pub use goals::{GoalDraft, TriagedGoals, create_goal, delete_goal, list_goals, log_progress, set_reflection, triage};
pub use share::{PlanKind, render_plan, set_relapse_section, set_safety_section, share_plan};

/// Fresh record id for goals, problems and contacts.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
